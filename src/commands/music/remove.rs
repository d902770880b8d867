use super::*;
use std::collections::HashSet;

/// Remove every queued song with the given title.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Exact title of the song to remove"]
    #[rest]
    title: String,
) -> CommandResult {
    ctx.defer().await?;
    let context = request_context(ctx)?;
    let session = ctx.data().music.session(context.guild_id);

    let removed = session
        .remove_by_title(HashSet::from([title.trim().to_string()]))
        .await?;

    if removed.is_empty() {
        let embed = embedded_messages::error(
            context.user_id,
            "Remove",
            "No song with this title in the queue ...",
        );
        return send_reply(ctx, CreateReply::default().embed(embed)).await;
    }

    reply_success(ctx, "Remove", &removed_message(removed.len())).await
}

pub(crate) fn removed_message(count: usize) -> String {
    let plural = if count > 1 { "s" } else { "" };
    format!("`Removed` {count} song{plural} from the queue !")
}
