//! Message delivery. Every outgoing message goes through here so that a
//! channel the bot may not write to still gets the author an answer by DM.

#[cfg(feature = "music")]
use crate::commands::music::utils::voice::RequestContext;
use crate::{CommandResult, Context};
use poise::CreateReply;
use serenity::all::{CreateMessage, Http, Mentionable, UserId};
use std::fmt::Display;
use tracing::warn;

/// Whether `err` is Discord refusing the request for lack of permissions.
pub fn is_forbidden(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Http(http) => http.status_code().map(|code| code.as_u16()) == Some(403),
        _ => false,
    }
}

/// Text sent by DM when the bot cannot post in `channel`.
pub fn forbidden_notice(channel: impl Display, guild: impl Display) -> String {
    format!(
        "Hey, seems like I can't send any message in {channel} on {guild}\n\
         May you inform the server team about this issue? :slight_smile:"
    )
}

/// Reply to a command, falling back to a DM to the author on a 403.
pub async fn send_reply(ctx: Context<'_>, reply: CreateReply) -> CommandResult {
    let embeds = reply.embeds.clone();

    match ctx.send(reply).await {
        Ok(_) => Ok(()),
        Err(err) if is_forbidden(&err) => {
            warn!(
                "Missing permissions to answer in channel {}, sending a DM to {}",
                ctx.channel_id(),
                ctx.author().name
            );
            let guild = ctx
                .guild()
                .map(|guild| guild.name.clone())
                .unwrap_or_else(|| "this server".to_string());
            let notice = forbidden_notice(ctx.channel_id().mention(), guild);
            let message = CreateMessage::new().embeds(embeds);
            send_direct(ctx.http(), ctx.author().id, notice, message).await?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Post `message` in the channel of `context`, with the same DM fallback as
/// [`send_reply`]. Used for messages that are not a reply to a command.
#[cfg(feature = "music")]
pub async fn deliver(
    http: &Http,
    context: &RequestContext,
    message: CreateMessage,
) -> serenity::Result<()> {
    match context.channel_id.send_message(http, message.clone()).await {
        Ok(_) => Ok(()),
        Err(err) if is_forbidden(&err) => {
            warn!(
                "Missing permissions in channel {}, sending a DM to {}",
                context.channel_id, context.user_name
            );
            let notice = forbidden_notice(context.channel_id.mention(), context.guild_id);
            send_direct(http, context.user_id, notice, message).await
        }
        Err(err) => Err(err),
    }
}

/// DM `message` to `user` with `notice` as its text.
pub async fn send_direct(
    http: &Http,
    user: UserId,
    notice: String,
    message: CreateMessage,
) -> serenity::Result<()> {
    user.direct_message(http, message.content(notice)).await.map(|_| ())
}
