use super::*;
use crate::commands::music::utils::button_controls::{
    SEARCH_SELECT_PREFIX, picked_tracks, search_select, selected_values,
};
use serenity::all::{ComponentInteractionCollector, CreateInteractionResponse};
use std::time::Duration;

const PICK_TIMEOUT: Duration = Duration::from_secs(120);

/// Search for a song and pick the results to queue.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn search(
    ctx: Context<'_>,
    #[description = "Search query"]
    #[rest]
    query: String,
) -> CommandResult {
    ctx.defer().await?;
    let context = request_context(ctx)?;
    let music = &ctx.data().music;
    let limit = music.settings().search_limit;

    let tracks = match music.search(query.trim(), SearchMode::Interactive(limit)).await {
        Ok(tracks) => tracks,
        Err(err) => return reply_error(ctx, "Search", &err).await,
    };

    let select_id = format!("{}_{}", SEARCH_SELECT_PREFIX, ctx.id());
    let Some(menu) = search_select(&select_id, &tracks) else {
        let embed = embedded_messages::error(
            context.user_id,
            "Search",
            "Could not find the song(s) ... Try other keywords.",
        );
        return send_reply(ctx, CreateReply::default().embed(embed)).await;
    };

    send_reply(
        ctx,
        CreateReply::default()
            .embed(embedded_messages::search_results(context.user_id, &tracks))
            .components(vec![menu]),
    )
    .await?;

    let Some(interaction) = ComponentInteractionCollector::new(ctx)
        .author_id(context.user_id)
        .filter(move |interaction| interaction.data.custom_id == select_id)
        .timeout(PICK_TIMEOUT)
        .await
    else {
        debug!("Search selection of {} timed out", context.user_name);
        return Ok(());
    };

    interaction
        .create_response(ctx.http(), CreateInteractionResponse::Acknowledge)
        .await?;

    let picked = picked_tracks(&tracks, selected_values(&interaction));
    if picked.is_empty() {
        return Ok(());
    }

    let session = music.session(context.guild_id);
    enqueue_tracks(ctx, &session, context, picked).await
}
