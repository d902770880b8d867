//! Per-guild playback driver.
//!
//! Each guild gets one task owning its queue, voice state and playback state.
//! Commands, stream preparation results and track completion callbacks all
//! arrive as [`SessionCommand`]s on a single channel, so they are applied one
//! at a time in the order they were sent. Every playback attempt carries a
//! token; results and completions whose token is no longer current are
//! dropped, which is how `clear`, `skip` and `disconnect` cancel work that is
//! already in flight.

use super::inactivity::spawn_watchdog;
use super::music_manager::{MusicError, MusicResult};
use super::queue_manager::{EntryId, PlayQueue, QueueEntry};
use super::voice::{
    DisconnectReason, Notifier, PlaybackNotice, PresenceChange, RequestContext, TrackEndSender,
    VoicePlatform,
};
use crate::commands::music::audio_sources::MediaResolver;
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;
use crate::config::MusicSettings;
use serenity::model::id::{ChannelId, GuildId};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VoiceState {
    #[default]
    Disconnected,
    Connecting,
    Connected(ChannelId),
}

impl VoiceState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    pub fn channel(&self) -> Option<ChannelId> {
        match self {
            Self::Connected(channel) => Some(*channel),
            _ => None,
        }
    }
}

/// What the guild is doing right now, as seen from outside the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Resolving(Arc<TrackMetadata>),
    Playing(Arc<TrackMetadata>),
    Paused(Arc<TrackMetadata>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStatus {
    pub voice: VoiceState,
    pub playback: PlaybackStatus,
    pub queue_len: usize,
}

impl SessionStatus {
    /// Audio is streaming, or about to.
    pub fn is_playing(&self) -> bool {
        matches!(
            self.playback,
            PlaybackStatus::Playing(_) | PlaybackStatus::Resolving(_)
        )
    }

    /// Nothing playing and nothing queued. A paused track counts as idle.
    pub fn is_idle(&self) -> bool {
        !self.is_playing() && self.queue_len == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Joined,
    Moved,
    AlreadyConnected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnqueueOutcome {
    pub ids: Vec<EntryId>,
    /// Queue length after the append (the track that started playing, if
    /// any, is no longer queued).
    pub queue_len: usize,
    /// Whether the append kicked off playback.
    pub started: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Resumed,
    Started,
    AlreadyPlaying,
    /// Idle with an empty queue: there is nothing to start.
    NothingQueued,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueSnapshot {
    pub playback: PlaybackStatus,
    pub upcoming: Vec<QueueEntry>,
    pub queue_len: usize,
    pub total_duration: Duration,
}

type Reply<T> = oneshot::Sender<T>;

pub(crate) enum SessionCommand<S> {
    Connect {
        channel_id: ChannelId,
        context: RequestContext,
        reply: Reply<MusicResult<ConnectOutcome>>,
    },
    Disconnect {
        reason: DisconnectReason,
        reply: Reply<MusicResult<()>>,
    },
    Enqueue {
        entries: Vec<(TrackMetadata, RequestContext)>,
        reply: Reply<EnqueueOutcome>,
    },
    Play {
        reply: Reply<MusicResult<PlayOutcome>>,
    },
    Pause {
        reply: Reply<MusicResult<Arc<TrackMetadata>>>,
    },
    Resume {
        reply: Reply<MusicResult<Arc<TrackMetadata>>>,
    },
    Skip {
        reply: Reply<MusicResult<Arc<TrackMetadata>>>,
    },
    Clear {
        reply: Reply<usize>,
    },
    Snapshot {
        limit: usize,
        reply: Reply<QueueSnapshot>,
    },
    RemoveEntries {
        ids: Vec<EntryId>,
        reply: Reply<Vec<QueueEntry>>,
    },
    RemoveByTitle {
        titles: HashSet<String>,
        reply: Reply<Vec<QueueEntry>>,
    },
    Resolved {
        token: u64,
        entry: QueueEntry,
        stream: Option<S>,
    },
    TrackEnded {
        token: u64,
        error: Option<String>,
    },
    Presence(PresenceChange),
    IdleTimeout {
        connection: u64,
    },
}

#[derive(Debug, Default)]
enum Playback {
    #[default]
    Idle,
    Resolving {
        token: u64,
        entry: QueueEntry,
    },
    Playing {
        token: u64,
        entry: QueueEntry,
    },
    Paused {
        token: u64,
        entry: QueueEntry,
    },
}

impl Playback {
    fn status(&self) -> PlaybackStatus {
        match self {
            Self::Idle => PlaybackStatus::Idle,
            Self::Resolving { entry, .. } => PlaybackStatus::Resolving(entry.track.clone()),
            Self::Playing { entry, .. } => PlaybackStatus::Playing(entry.track.clone()),
            Self::Paused { entry, .. } => PlaybackStatus::Paused(entry.track.clone()),
        }
    }

    /// Whether the platform currently holds a track for us.
    fn is_streaming(&self) -> bool {
        matches!(self, Self::Playing { .. } | Self::Paused { .. })
    }
}

/// Collaborators shared by every guild session.
pub(crate) struct SessionDeps<S: Send + 'static> {
    pub settings: MusicSettings,
    pub platform: Arc<dyn VoicePlatform<S>>,
    pub resolver: Arc<dyn MediaResolver<S>>,
    pub notifier: Arc<dyn Notifier>,
}

impl<S: Send + 'static> Clone for SessionDeps<S> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            platform: Arc::clone(&self.platform),
            resolver: Arc::clone(&self.resolver),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

pub(crate) struct GuildSession<S: Send + 'static> {
    guild_id: GuildId,
    deps: SessionDeps<S>,
    commands: mpsc::WeakUnboundedSender<SessionCommand<S>>,
    status: watch::Sender<SessionStatus>,
    queue: PlayQueue,
    voice: VoiceState,
    playback: Playback,
    last_token: u64,
    connection: u64,
    watchdog: Option<JoinHandle<()>>,
    last_context: Option<RequestContext>,
}

impl<S: Send + 'static> GuildSession<S> {
    /// Start the session task. It runs until every strong sender is dropped.
    pub(crate) fn spawn(
        guild_id: GuildId,
        deps: SessionDeps<S>,
    ) -> (
        mpsc::UnboundedSender<SessionCommand<S>>,
        watch::Receiver<SessionStatus>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (status, status_rx) = watch::channel(SessionStatus::default());

        let session = Self {
            guild_id,
            deps,
            commands: tx.downgrade(),
            status,
            queue: PlayQueue::new(),
            voice: VoiceState::Disconnected,
            playback: Playback::Idle,
            last_token: 0,
            connection: 0,
            watchdog: None,
            last_context: None,
        };
        tokio::spawn(session.run(rx));

        (tx, status_rx)
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand<S>>) {
        debug!("Session task started for guild {}", self.guild_id);
        while let Some(command) = commands.recv().await {
            self.handle(command).await;
        }
        if let Some(watchdog) = self.watchdog.take() {
            watchdog.abort();
        }
        debug!("Session task finished for guild {}", self.guild_id);
    }

    async fn handle(&mut self, command: SessionCommand<S>) {
        match command {
            SessionCommand::Connect {
                channel_id,
                context,
                reply,
            } => {
                let _ = reply.send(self.connect(channel_id, context).await);
            }
            SessionCommand::Disconnect { reason, reply } => {
                let _ = reply.send(self.disconnect(reason).await);
            }
            SessionCommand::Enqueue { entries, reply } => {
                let _ = reply.send(self.enqueue(entries));
            }
            SessionCommand::Play { reply } => {
                let _ = reply.send(self.play().await);
            }
            SessionCommand::Pause { reply } => {
                let _ = reply.send(self.pause().await);
            }
            SessionCommand::Resume { reply } => {
                let _ = reply.send(self.resume().await);
            }
            SessionCommand::Skip { reply } => {
                let _ = reply.send(self.skip().await);
            }
            SessionCommand::Clear { reply } => {
                let _ = reply.send(self.clear().await);
            }
            SessionCommand::Snapshot { limit, reply } => {
                let _ = reply.send(self.snapshot(limit));
            }
            SessionCommand::RemoveEntries { ids, reply } => {
                let removed = self.queue.remove_ids(&ids);
                self.publish();
                let _ = reply.send(removed);
            }
            SessionCommand::RemoveByTitle { titles, reply } => {
                let removed = self.queue.remove_by_title(&titles);
                self.publish();
                let _ = reply.send(removed);
            }
            SessionCommand::Resolved {
                token,
                entry,
                stream,
            } => self.on_resolved(token, entry, stream).await,
            SessionCommand::TrackEnded { token, error } => self.on_track_end(token, error),
            SessionCommand::Presence(change) => self.on_presence(change).await,
            SessionCommand::IdleTimeout { connection } => self.on_idle_timeout(connection).await,
        }
    }

    fn publish(&self) {
        let status = SessionStatus {
            voice: self.voice,
            playback: self.playback.status(),
            queue_len: self.queue.len(),
        };
        self.status.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }

    fn next_token(&mut self) -> u64 {
        self.last_token += 1;
        self.last_token
    }

    fn ensure_connected(&self) -> MusicResult<()> {
        if self.voice.is_connected() {
            Ok(())
        } else {
            Err(MusicError::NotConnected)
        }
    }

    async fn connect(
        &mut self,
        channel_id: ChannelId,
        context: RequestContext,
    ) -> MusicResult<ConnectOutcome> {
        self.last_context = Some(context);

        match self.voice {
            VoiceState::Connected(current) if current == channel_id => {
                Ok(ConnectOutcome::AlreadyConnected)
            }
            VoiceState::Connected(_) => {
                self.deps.platform.join(self.guild_id, channel_id).await?;
                info!("Moved to channel {} in guild {}", channel_id, self.guild_id);
                self.voice = VoiceState::Connected(channel_id);
                self.publish();
                Ok(ConnectOutcome::Moved)
            }
            VoiceState::Disconnected | VoiceState::Connecting => {
                self.voice = VoiceState::Connecting;
                self.publish();

                if let Err(err) = self.deps.platform.join(self.guild_id, channel_id).await {
                    warn!(
                        "Failed to join channel {} in guild {}: {}",
                        channel_id, self.guild_id, err
                    );
                    self.voice = VoiceState::Disconnected;
                    self.publish();
                    return Err(err);
                }

                info!("Joined channel {} in guild {}", channel_id, self.guild_id);
                self.voice = VoiceState::Connected(channel_id);
                self.connection += 1;
                self.start_watchdog();

                // Tracks added while disconnected start playing now.
                if matches!(self.playback, Playback::Idle) && !self.queue.is_empty() {
                    self.advance();
                }
                self.publish();
                Ok(ConnectOutcome::Joined)
            }
        }
    }

    fn start_watchdog(&mut self) {
        if self
            .watchdog
            .as_ref()
            .is_some_and(|watchdog| !watchdog.is_finished())
        {
            return;
        }

        let connection = self.connection;
        let commands = self.commands.clone();
        self.watchdog = Some(spawn_watchdog(
            self.guild_id,
            &self.deps.settings,
            self.status.subscribe(),
            move || {
                if let Some(tx) = commands.upgrade() {
                    let _ = tx.send(SessionCommand::IdleTimeout { connection });
                }
            },
        ));
    }

    async fn disconnect(&mut self, reason: DisconnectReason) -> MusicResult<()> {
        if !self.voice.is_connected() {
            return match reason {
                DisconnectReason::Command => Err(MusicError::NotConnected),
                _ => Ok(()),
            };
        }

        if let Some(watchdog) = self.watchdog.take() {
            watchdog.abort();
        }

        if self.playback.is_streaming() {
            if let Err(err) = self.deps.platform.stop(self.guild_id).await {
                warn!("Failed to stop track in guild {}: {}", self.guild_id, err);
            }
        }
        if let Err(err) = self.deps.platform.leave(self.guild_id).await {
            warn!("Failed to leave voice in guild {}: {}", self.guild_id, err);
        }

        let dropped = self.queue.clear();
        self.next_token();
        self.playback = Playback::Idle;
        self.voice = VoiceState::Disconnected;
        self.publish();

        info!(
            "Disconnected from guild {} ({:?}), dropped {} queued tracks",
            self.guild_id, reason, dropped
        );

        if reason != DisconnectReason::Command {
            if let Some(context) = self.last_context.clone() {
                self.notify(context, PlaybackNotice::Disconnected(reason));
            }
        }

        Ok(())
    }

    fn enqueue(&mut self, entries: Vec<(TrackMetadata, RequestContext)>) -> EnqueueOutcome {
        if let Some((_, context)) = entries.last() {
            self.last_context = Some(context.clone());
        }

        let ids = self.queue.append(entries);
        debug!(
            "Queued {} tracks in guild {} ({} waiting)",
            ids.len(),
            self.guild_id,
            self.queue.len()
        );

        let started = self.voice.is_connected()
            && matches!(self.playback, Playback::Idle)
            && !self.queue.is_empty();
        if started {
            self.advance();
        }
        self.publish();

        EnqueueOutcome {
            ids,
            queue_len: self.queue.len(),
            started,
        }
    }

    /// Pop the next entry and start preparing its stream off the session task.
    fn advance(&mut self) {
        let token = self.next_token();

        if !self.voice.is_connected() {
            self.playback = Playback::Idle;
            self.publish();
            return;
        }

        let Some(entry) = self.queue.pop_front() else {
            debug!("Queue of guild {} is empty, going idle", self.guild_id);
            self.playback = Playback::Idle;
            self.publish();
            return;
        };

        debug!(
            "Preparing '{}' for guild {}",
            entry.track.title, self.guild_id
        );
        self.playback = Playback::Resolving {
            token,
            entry: entry.clone(),
        };
        self.publish();

        let resolver = Arc::clone(&self.deps.resolver);
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let stream = resolver.resolve_stream(&entry.track).await;
            if let Some(tx) = commands.upgrade() {
                let _ = tx.send(SessionCommand::Resolved {
                    token,
                    entry,
                    stream,
                });
            }
        });
    }

    fn track_end_sender(&self, token: u64) -> TrackEndSender {
        let commands = self.commands.clone();
        TrackEndSender::new(move |error| {
            if let Some(tx) = commands.upgrade() {
                let _ = tx.send(SessionCommand::TrackEnded { token, error });
            }
        })
    }

    async fn on_resolved(&mut self, token: u64, entry: QueueEntry, stream: Option<S>) {
        let current = matches!(
            &self.playback,
            Playback::Resolving { token: expected, .. } if *expected == token
        );
        if !current {
            debug!(
                "Discarding stale stream for '{}' in guild {}",
                entry.track.title, self.guild_id
            );
            return;
        }

        let Some(stream) = stream else {
            warn!(
                "Could not prepare '{}' ({}) in guild {}, skipping it",
                entry.track.title, entry.track.url, self.guild_id
            );
            self.advance();
            self.report_failure(entry);
            return;
        };

        let on_end = self.track_end_sender(token);
        match self.deps.platform.play(self.guild_id, stream, on_end).await {
            Ok(()) => {
                info!("Now playing '{}' in guild {}", entry.track.title, self.guild_id);
                let notice = PlaybackNotice::NowPlaying(entry.track.clone());
                let context = entry.context.clone();
                self.playback = Playback::Playing { token, entry };
                self.publish();
                self.notify(context, notice);
            }
            Err(err) => {
                error!(
                    "Failed to play '{}' in guild {}: {}",
                    entry.track.title, self.guild_id, err
                );
                self.advance();
                self.report_failure(entry);
            }
        }
    }

    fn report_failure(&self, entry: QueueEntry) {
        self.notify(entry.context, PlaybackNotice::TrackFailed(entry.track));
    }

    /// Deliver `notice` from its own task. The session never waits on the
    /// platform's message delivery.
    fn notify(&self, context: RequestContext, notice: PlaybackNotice) {
        let notifier = Arc::clone(&self.deps.notifier);
        tokio::spawn(async move {
            notifier.notify(&context, notice).await;
        });
    }

    fn on_track_end(&mut self, token: u64, error: Option<String>) {
        let finished = match &self.playback {
            Playback::Playing {
                token: current,
                entry,
            }
            | Playback::Paused {
                token: current,
                entry,
            } if *current == token => Some(entry.track.title.clone()),
            _ => None,
        };

        let Some(title) = finished else {
            debug!("Ignoring stale track end in guild {}", self.guild_id);
            return;
        };

        match error {
            Some(err) => warn!(
                "Playback of '{}' failed in guild {}: {}",
                title, self.guild_id, err
            ),
            None => debug!("Finished '{}' in guild {}", title, self.guild_id),
        }
        self.advance();
    }

    async fn play(&mut self) -> MusicResult<PlayOutcome> {
        self.ensure_connected()?;

        match &self.playback {
            Playback::Paused { .. } => self.resume().await.map(|_| PlayOutcome::Resumed),
            Playback::Idle if self.queue.is_empty() => Ok(PlayOutcome::NothingQueued),
            Playback::Idle => {
                self.advance();
                Ok(PlayOutcome::Started)
            }
            Playback::Resolving { .. } | Playback::Playing { .. } => {
                Ok(PlayOutcome::AlreadyPlaying)
            }
        }
    }

    async fn pause(&mut self) -> MusicResult<Arc<TrackMetadata>> {
        self.ensure_connected()?;

        match std::mem::take(&mut self.playback) {
            Playback::Playing { token, entry } => {
                if let Err(err) = self.deps.platform.pause(self.guild_id).await {
                    self.playback = Playback::Playing { token, entry };
                    return Err(err);
                }
                let track = entry.track.clone();
                self.playback = Playback::Paused { token, entry };
                self.publish();
                Ok(track)
            }
            other => {
                let err = match other {
                    Playback::Paused { .. } => MusicError::AlreadyPaused,
                    _ => MusicError::NothingPlaying,
                };
                self.playback = other;
                Err(err)
            }
        }
    }

    async fn resume(&mut self) -> MusicResult<Arc<TrackMetadata>> {
        self.ensure_connected()?;

        match std::mem::take(&mut self.playback) {
            Playback::Paused { token, entry } => {
                if let Err(err) = self.deps.platform.resume(self.guild_id).await {
                    self.playback = Playback::Paused { token, entry };
                    return Err(err);
                }
                let track = entry.track.clone();
                self.playback = Playback::Playing { token, entry };
                self.publish();
                Ok(track)
            }
            other => {
                self.playback = other;
                Err(MusicError::NotPaused)
            }
        }
    }

    async fn skip(&mut self) -> MusicResult<Arc<TrackMetadata>> {
        self.ensure_connected()?;

        let skipped = match &self.playback {
            Playback::Idle => return Err(MusicError::NothingPlaying),
            Playback::Resolving { entry, .. }
            | Playback::Playing { entry, .. }
            | Playback::Paused { entry, .. } => entry.track.clone(),
        };

        if self.playback.is_streaming() {
            if let Err(err) = self.deps.platform.stop(self.guild_id).await {
                warn!("Failed to stop track in guild {}: {}", self.guild_id, err);
            }
        }

        info!("Skipped '{}' in guild {}", skipped.title, self.guild_id);
        self.advance();
        Ok(skipped)
    }

    async fn clear(&mut self) -> usize {
        let dropped = self.queue.clear();

        if self.playback.is_streaming() {
            if let Err(err) = self.deps.platform.stop(self.guild_id).await {
                warn!("Failed to stop track in guild {}: {}", self.guild_id, err);
            }
        }
        if !matches!(self.playback, Playback::Idle) {
            self.next_token();
            self.playback = Playback::Idle;
        }
        self.publish();

        info!("Cleared {} queued tracks in guild {}", dropped, self.guild_id);
        dropped
    }

    fn snapshot(&self, limit: usize) -> QueueSnapshot {
        QueueSnapshot {
            playback: self.playback.status(),
            upcoming: self.queue.snapshot(limit),
            queue_len: self.queue.len(),
            total_duration: self.queue.total_duration(),
        }
    }

    async fn on_presence(&mut self, change: PresenceChange) {
        match change {
            PresenceChange::Joined(channel) => {
                if self.voice.is_connected() {
                    self.start_watchdog();
                } else {
                    debug!(
                        "Ignoring join to {} in guild {} while {:?}",
                        channel, self.guild_id, self.voice
                    );
                }
            }
            PresenceChange::Moved(channel) => {
                if self.voice.is_connected() {
                    self.voice = VoiceState::Connected(channel);
                    self.publish();
                }
            }
            PresenceChange::Left(channel) => {
                // A leave for another channel is the tail of an earlier move
                // or disconnect.
                if self.voice.channel() == Some(channel) {
                    warn!("Removed from voice in guild {}", self.guild_id);
                    let _ = self.disconnect(DisconnectReason::Platform).await;
                }
            }
        }
    }

    async fn on_idle_timeout(&mut self, connection: u64) {
        if connection != self.connection || !self.voice.is_connected() {
            debug!("Ignoring stale inactivity timeout in guild {}", self.guild_id);
            return;
        }
        let _ = self.disconnect(DisconnectReason::Inactivity).await;
    }
}
