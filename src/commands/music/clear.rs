use super::*;

/// Clear the music queue.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn clear(ctx: Context<'_>) -> CommandResult {
    ctx.defer().await?;
    let context = request_context(ctx)?;
    let session = ctx.data().music.session(context.guild_id);

    if !session.status().voice.is_connected() {
        return reply_error(ctx, "Clear", &MusicError::NotConnected).await;
    }

    report(ctx, "Clear", session.clear().await, "`Cleared` the queue !").await
}
