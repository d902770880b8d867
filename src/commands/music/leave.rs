use super::*;

/// Disconnect the Bot from any discord channel of the server.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn disconnect(ctx: Context<'_>) -> CommandResult {
    ctx.defer().await?;
    let context = request_context(ctx)?;
    let session = ctx.data().music.session(context.guild_id);

    report(ctx, "Disconnect", session.disconnect().await, "`Disconnected` the bot !").await
}
