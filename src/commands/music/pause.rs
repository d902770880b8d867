use super::*;

/// Put the current song in pause.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    ctx.defer().await?;
    let context = request_context(ctx)?;
    let session = ctx.data().music.session(context.guild_id);

    report(ctx, "Pause", session.pause().await, "`Paused` the bot !").await
}

/// Resume the current song.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    ctx.defer().await?;
    let context = request_context(ctx)?;
    let session = ctx.data().music.session(context.guild_id);

    report(ctx, "Resume", session.resume().await, "`Resumed` the bot !").await
}
