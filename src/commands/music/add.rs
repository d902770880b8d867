use super::*;

/// Add a song or a playlist to the queue, can be used with keyword and URLs.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "URL or search query"]
    #[rest]
    query: String,
) -> CommandResult {
    ctx.defer().await?;
    let context = request_context(ctx)?;
    let session = ctx.data().music.session(context.guild_id);

    enqueue_query(ctx, &session, context, query.trim()).await
}
