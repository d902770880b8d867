pub mod add;
pub mod clear;
pub mod leave;
pub mod pause;
pub mod play;
pub mod queue;
pub mod remove;
pub mod search;
pub mod skip;

pub mod audio_sources;
pub mod utils;

use crate::utils::communication::send_reply;
use crate::{CommandResult, Context};
use audio_sources::track_metadata::TrackMetadata;
use audio_sources::SearchMode;
use poise::CreateReply;
use serenity::all::Mentionable;
use songbird::input::Input;
use tracing::{debug, info, warn};
use utils::button_controls;
use utils::embedded_messages;
use utils::music_manager::{MusicError, MusicManager, MusicResult, SessionHandle};
use utils::session::ConnectOutcome;
use utils::voice::RequestContext;

/// Music manager over songbird inputs, as wired up in `main`.
pub type SongbirdMusic = MusicManager<Input>;
pub type SongbirdSession = SessionHandle<Input>;

/// Who invoked the command and where.
fn request_context(ctx: Context<'_>) -> MusicResult<RequestContext> {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;
    Ok(RequestContext {
        guild_id,
        channel_id: ctx.channel_id(),
        user_id: ctx.author().id,
        user_name: ctx.author().name.clone(),
    })
}

async fn reply_success(ctx: Context<'_>, title: &str, content: &str) -> CommandResult {
    let embed = embedded_messages::response(ctx.author().id, title, content);
    send_reply(ctx, CreateReply::default().embed(embed)).await
}

async fn reply_error(ctx: Context<'_>, title: &str, err: &MusicError) -> CommandResult {
    debug!("{} failed for {}: {}", title, ctx.author().name, err);
    let embed = embedded_messages::music_error(ctx.author().id, title, err);
    send_reply(ctx, CreateReply::default().embed(embed)).await
}

/// Report a failed session operation to the author. A closed session is
/// propagated as a command error.
async fn fail(ctx: Context<'_>, title: &str, err: MusicError) -> CommandResult {
    match err {
        MusicError::SessionClosed => Err(err.into()),
        err => reply_error(ctx, title, &err).await,
    }
}

/// Reply with the outcome of a session operation.
async fn report<T>(
    ctx: Context<'_>,
    title: &str,
    outcome: MusicResult<T>,
    content: &str,
) -> CommandResult {
    match outcome {
        Ok(_) => reply_success(ctx, title, content).await,
        Err(err) => fail(ctx, title, err).await,
    }
}

/// Put the bot in the author's voice channel. Errors are already reported to
/// the author when this returns `Err`.
async fn connect(
    ctx: Context<'_>,
    session: &SongbirdSession,
    context: &RequestContext,
) -> MusicResult<ConnectOutcome> {
    let joined = match SongbirdMusic::get_user_voice_channel(
        &ctx.serenity_context().cache,
        context.guild_id,
        context.user_id,
    ) {
        Ok(channel_id) => session
            .connect(channel_id, context.clone())
            .await
            .map(|outcome| (channel_id, outcome)),
        Err(err) => Err(err),
    };

    match joined {
        Ok((channel_id, outcome)) => {
            if outcome != ConnectOutcome::AlreadyConnected {
                let content =
                    format!("`Connected` the Bot to the {} channel !", channel_id.mention());
                if let Err(e) = reply_success(ctx, "Connect", &content).await {
                    warn!("Failed to announce voice connection: {}", e);
                }
            }
            Ok(outcome)
        }
        Err(err) => {
            if let Err(e) = reply_error(ctx, "Connect", &err).await {
                warn!("Failed to report connection error: {}", e);
            }
            Err(err)
        }
    }
}

/// Resolve `query` to its first match (or whole playlist) and queue it.
async fn enqueue_query(
    ctx: Context<'_>,
    session: &SongbirdSession,
    context: RequestContext,
    query: &str,
) -> CommandResult {
    let tracks = match ctx.data().music.search(query, SearchMode::FirstMatch).await {
        Ok(tracks) => tracks,
        Err(err) => return reply_error(ctx, "Add", &err).await,
    };

    if tracks.is_empty() {
        let embed = embedded_messages::error(
            ctx.author().id,
            "Add",
            "Could not find the song(s) ... Try other keywords / URLs.",
        );
        return send_reply(ctx, CreateReply::default().embed(embed)).await;
    }

    enqueue_tracks(ctx, session, context, tracks).await
}

/// Queue `tracks` and answer with the "added" embed and the player buttons.
async fn enqueue_tracks(
    ctx: Context<'_>,
    session: &SongbirdSession,
    context: RequestContext,
    tracks: Vec<TrackMetadata>,
) -> CommandResult {
    let embed = embedded_messages::added(context.user_id, &tracks);
    let entries = tracks.into_iter().map(|track| (track, context.clone())).collect();

    let outcome = session.enqueue(entries).await?;
    info!(
        "Queued {} tracks in guild {} (started: {})",
        outcome.ids.len(),
        context.guild_id,
        outcome.started
    );

    send_reply(
        ctx,
        CreateReply::default()
            .embed(embed)
            .components(button_controls::player_buttons()),
    )
    .await
}
