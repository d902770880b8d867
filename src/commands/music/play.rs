use super::*;
use crate::commands::music::utils::session::PlayOutcome;

/// Play a song or a playlist, can be used with keyword and URLs.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"]
    #[rest]
    query: Option<String>,
) -> CommandResult {
    ctx.defer().await?;
    let context = request_context(ctx)?;
    let session = ctx.data().music.session(context.guild_id);

    if connect(ctx, &session, &context).await.is_err() {
        return Ok(());
    }

    match query.as_deref().map(str::trim).filter(|query| !query.is_empty()) {
        Some(query) => {
            info!("Received play command with query: {}", query);
            enqueue_query(ctx, &session, context, query).await
        }
        None => match session.play().await {
            Ok(PlayOutcome::Resumed) => reply_success(ctx, "Play", "`Resumed` the music !").await,
            Ok(PlayOutcome::Started) => reply_success(ctx, "Play", "`Started` the queue !").await,
            Ok(PlayOutcome::AlreadyPlaying | PlayOutcome::NothingQueued) => {
                reply_success(ctx, "Play", "The music is already playing ...").await
            }
            Err(err) => fail(ctx, "Play", err).await,
        },
    }
}
