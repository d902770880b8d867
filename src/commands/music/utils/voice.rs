//! Capabilities the music subsystem needs from the chat platform: a voice
//! connection that can stream audio, and a way to tell users what happened.

use super::music_manager::MusicResult;
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;
use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::fmt;
use std::sync::Arc;

/// Who asked for something, and where to answer them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub user_id: UserId,
    pub user_name: String,
}

/// Completion callback handed to [`VoicePlatform::play`].
///
/// Calling it is cheap and never blocks, so it can be invoked from whichever
/// thread the platform reports track completion on.
#[derive(Clone)]
pub struct TrackEndSender {
    notify: Arc<dyn Fn(Option<String>) + Send + Sync>,
}

impl TrackEndSender {
    pub fn new<F>(notify: F) -> Self
    where
        F: Fn(Option<String>) + Send + Sync + 'static,
    {
        Self {
            notify: Arc::new(notify),
        }
    }

    /// Report that the track stopped, with the playback error if there was one.
    pub fn finished(&self, error: Option<String>) {
        (self.notify)(error)
    }
}

impl fmt::Debug for TrackEndSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackEndSender").finish_non_exhaustive()
    }
}

/// Voice side of the platform. `S` is the playable stream type.
#[async_trait]
pub trait VoicePlatform<S: Send + 'static>: Send + Sync {
    /// Join `channel_id`, moving there if already connected elsewhere.
    async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> MusicResult<()>;

    async fn leave(&self, guild_id: GuildId) -> MusicResult<()>;

    /// Replace whatever is playing with `stream`. `on_end` fires once the
    /// track finishes, is stopped, or errors.
    async fn play(&self, guild_id: GuildId, stream: S, on_end: TrackEndSender)
    -> MusicResult<()>;

    async fn pause(&self, guild_id: GuildId) -> MusicResult<()>;

    async fn resume(&self, guild_id: GuildId) -> MusicResult<()>;

    async fn stop(&self, guild_id: GuildId) -> MusicResult<()>;
}

/// Why a voice session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// A user asked for it.
    Command,
    /// The inactivity watchdog fired.
    Inactivity,
    /// The platform removed the bot from voice (kicked, channel deleted...).
    Platform,
}

/// Status updates pushed to users outside of a command reply.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackNotice {
    NowPlaying(Arc<TrackMetadata>),
    /// The track could not be streamed and was dropped from the queue.
    TrackFailed(Arc<TrackMetadata>),
    Disconnected(DisconnectReason),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, context: &RequestContext, notice: PlaybackNotice);
}

/// Notifier that drops everything.
pub struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn notify(&self, _context: &RequestContext, _notice: PlaybackNotice) {}
}

/// A voice presence transition of the bot's own account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceChange {
    Joined(ChannelId),
    Moved(ChannelId),
    /// Left the given channel.
    Left(ChannelId),
}

impl PresenceChange {
    /// Classify a voice state update. Only updates for `bot_id` that change the
    /// channel count; anything else (other members, mute or deafen toggles)
    /// is `None`.
    pub fn for_bot(
        bot_id: UserId,
        user_id: UserId,
        before: Option<ChannelId>,
        after: Option<ChannelId>,
    ) -> Option<Self> {
        if user_id != bot_id {
            return None;
        }

        match (before, after) {
            (None, Some(channel)) => Some(Self::Joined(channel)),
            (Some(old), Some(new)) if old != new => Some(Self::Moved(new)),
            (Some(old), None) => Some(Self::Left(old)),
            _ => None,
        }
    }
}
