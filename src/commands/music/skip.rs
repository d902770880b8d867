use super::*;

/// Skip the current song.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    ctx.defer().await?;
    let context = request_context(ctx)?;
    let session = ctx.data().music.session(context.guild_id);

    report(ctx, "Skip", session.skip().await, "`Skipped` the song !").await
}
