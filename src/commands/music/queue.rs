use super::*;
use crate::commands::music::remove::removed_message;
use crate::commands::music::utils::button_controls::{
    QUEUE_SELECT_PREFIX, picked_entry_ids, queue_remove_select, selected_values,
};
use serenity::all::{
    ComponentInteractionCollector, CreateInteractionResponse, CreateInteractionResponseMessage,
};
use std::time::Duration;

/// Entries shown by the queue overview.
const QUEUE_PAGE: usize = 10;
const EDIT_TIMEOUT: Duration = Duration::from_secs(120);

/// Show the music queue and remove songs from it.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn queue(ctx: Context<'_>) -> CommandResult {
    ctx.defer().await?;
    let context = request_context(ctx)?;
    let session = ctx.data().music.session(context.guild_id);

    let snapshot = session.snapshot(QUEUE_PAGE).await?;
    let overview = embedded_messages::queue(context.user_id, &snapshot);

    let select_id = format!("{}_{}", QUEUE_SELECT_PREFIX, ctx.id());
    let Some(editor) = queue_remove_select(&select_id, &snapshot.upcoming) else {
        return send_reply(ctx, CreateReply::default().embed(overview)).await;
    };

    send_reply(
        ctx,
        CreateReply::default()
            .embed(overview)
            .components(vec![editor]),
    )
    .await?;

    let Some(interaction) = ComponentInteractionCollector::new(ctx)
        .author_id(context.user_id)
        .filter(move |interaction| interaction.data.custom_id == select_id)
        .timeout(EDIT_TIMEOUT)
        .await
    else {
        return Ok(());
    };

    let removed = session
        .remove_entries(picked_entry_ids(selected_values(&interaction)))
        .await?;
    info!(
        "{} removed {} entries from the queue of guild {}",
        context.user_name,
        removed.len(),
        context.guild_id
    );

    let message = removed_message(removed.len());
    let embed = embedded_messages::response(context.user_id, "Queue", &message);
    interaction
        .create_response(
            ctx.http(),
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .ephemeral(true),
            ),
        )
        .await?;

    Ok(())
}
