use super::queue_manager::{EntryId, QueueEntry};
use super::session::{
    ConnectOutcome, EnqueueOutcome, GuildSession, PlayOutcome, QueueSnapshot, SessionCommand,
    SessionDeps, SessionStatus,
};
use super::voice::{DisconnectReason, Notifier, PresenceChange, RequestContext, VoicePlatform};
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;
use crate::commands::music::audio_sources::{MediaResolver, SearchMode};
use crate::config::MusicSettings;
use dashmap::DashMap;
use serenity::cache::Cache;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

/// Errors that can occur during music operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Timed out joining the voice channel")]
    JoinTimeout,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Nothing is playing")]
    NothingPlaying,

    #[error("Playback is already paused")]
    AlreadyPaused,

    #[error("Playback is not paused")]
    NotPaused,

    #[error("Audio source error: {0}")]
    AudioSourceError(String),

    #[error("Playback error: {0}")]
    PlaybackError(String),

    #[error("Music session is no longer running")]
    SessionClosed,
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// Client side of one guild session. Cheap to clone; every call is applied by
/// the session task in the order it was made.
pub struct SessionHandle<S> {
    guild_id: GuildId,
    commands: mpsc::UnboundedSender<SessionCommand<S>>,
    status: watch::Receiver<SessionStatus>,
}

impl<S> Clone for SessionHandle<S> {
    fn clone(&self) -> Self {
        Self {
            guild_id: self.guild_id,
            commands: self.commands.clone(),
            status: self.status.clone(),
        }
    }
}

impl<S: Send + 'static> SessionHandle<S> {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand<S>,
    ) -> MusicResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .map_err(|_| MusicError::SessionClosed)?;
        response.await.map_err(|_| MusicError::SessionClosed)
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    /// Latest published status.
    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    pub async fn connect(
        &self,
        channel_id: ChannelId,
        context: RequestContext,
    ) -> MusicResult<ConnectOutcome> {
        self.request(|reply| SessionCommand::Connect {
            channel_id,
            context,
            reply,
        })
        .await?
    }

    /// Leave voice on request. The queue is dropped as well.
    pub async fn disconnect(&self) -> MusicResult<()> {
        self.request(|reply| SessionCommand::Disconnect {
            reason: DisconnectReason::Command,
            reply,
        })
        .await?
    }

    pub async fn enqueue(
        &self,
        entries: Vec<(TrackMetadata, RequestContext)>,
    ) -> MusicResult<EnqueueOutcome> {
        self.request(|reply| SessionCommand::Enqueue { entries, reply })
            .await
    }

    /// Resume if paused, otherwise start the queue if it is idle.
    pub async fn play(&self) -> MusicResult<PlayOutcome> {
        self.request(|reply| SessionCommand::Play { reply }).await?
    }

    pub async fn pause(&self) -> MusicResult<Arc<TrackMetadata>> {
        self.request(|reply| SessionCommand::Pause { reply }).await?
    }

    pub async fn resume(&self) -> MusicResult<Arc<TrackMetadata>> {
        self.request(|reply| SessionCommand::Resume { reply }).await?
    }

    pub async fn skip(&self) -> MusicResult<Arc<TrackMetadata>> {
        self.request(|reply| SessionCommand::Skip { reply }).await?
    }

    /// Stop the current track and empty the queue. Returns how many queued
    /// tracks were dropped.
    pub async fn clear(&self) -> MusicResult<usize> {
        self.request(|reply| SessionCommand::Clear { reply }).await
    }

    pub async fn snapshot(&self, limit: usize) -> MusicResult<QueueSnapshot> {
        self.request(|reply| SessionCommand::Snapshot { limit, reply })
            .await
    }

    pub async fn remove_entries(&self, ids: Vec<EntryId>) -> MusicResult<Vec<QueueEntry>> {
        self.request(|reply| SessionCommand::RemoveEntries { ids, reply })
            .await
    }

    pub async fn remove_by_title(&self, titles: HashSet<String>) -> MusicResult<Vec<QueueEntry>> {
        self.request(|reply| SessionCommand::RemoveByTitle { titles, reply })
            .await
    }

    /// Forward a presence change of the bot's own account. Fire and forget.
    pub fn presence(&self, change: PresenceChange) {
        if self.commands.send(SessionCommand::Presence(change)).is_err() {
            debug!("Dropped presence change for closed session {}", self.guild_id);
        }
    }
}

/// Registry of guild sessions, created lazily on first use.
pub struct MusicManager<S: Send + 'static> {
    sessions: DashMap<GuildId, SessionHandle<S>>,
    deps: SessionDeps<S>,
}

impl<S: Send + 'static> MusicManager<S> {
    pub fn new(
        platform: Arc<dyn VoicePlatform<S>>,
        resolver: Arc<dyn MediaResolver<S>>,
        notifier: Arc<dyn Notifier>,
        settings: MusicSettings,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            deps: SessionDeps {
                settings,
                platform,
                resolver,
                notifier,
            },
        }
    }

    pub fn settings(&self) -> &MusicSettings {
        &self.deps.settings
    }

    /// Session of `guild_id`, spawning it if this guild has none yet.
    pub fn session(&self, guild_id: GuildId) -> SessionHandle<S> {
        let mut handle = self
            .sessions
            .entry(guild_id)
            .or_insert_with(|| self.spawn_session(guild_id));
        if handle.is_closed() {
            *handle = self.spawn_session(guild_id);
        }
        handle.clone()
    }

    /// Session of `guild_id` if one was ever started.
    pub fn existing_session(&self, guild_id: GuildId) -> Option<SessionHandle<S>> {
        self.sessions.get(&guild_id).map(|handle| handle.clone())
    }

    fn spawn_session(&self, guild_id: GuildId) -> SessionHandle<S> {
        debug!("Spawning music session for guild {}", guild_id);
        let (commands, status) = GuildSession::spawn(guild_id, self.deps.clone());
        SessionHandle {
            guild_id,
            commands,
            status,
        }
    }

    pub async fn search(&self, query: &str, mode: SearchMode) -> MusicResult<Vec<TrackMetadata>> {
        self.deps.resolver.search(query, mode).await
    }

    /// Route a voice presence change of the bot to its guild session.
    pub fn handle_bot_voice_update(&self, guild_id: GuildId, change: PresenceChange) {
        match self.existing_session(guild_id) {
            Some(session) => session.presence(change),
            None => debug!(
                "No music session for guild {}, ignoring {:?}",
                guild_id, change
            ),
        }
    }

    /// Get the voice channel ID that the user is currently in
    pub fn get_user_voice_channel(
        cache: &Cache,
        guild_id: GuildId,
        user_id: UserId,
    ) -> MusicResult<ChannelId> {
        let guild = cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;

        let voice_state = guild
            .voice_states
            .get(&user_id)
            .ok_or(MusicError::UserNotInVoiceChannel)?;

        voice_state
            .channel_id
            .ok_or(MusicError::UserNotInVoiceChannel)
    }
}
