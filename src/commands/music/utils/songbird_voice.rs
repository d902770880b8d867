//! [`VoicePlatform`] backed by songbird.

use super::event_handlers::TrackEndNotifier;
use super::music_manager::{MusicError, MusicResult};
use super::voice::{TrackEndSender, VoicePlatform};
use dashmap::DashMap;
use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use songbird::error::JoinError;
use songbird::input::Input;
use songbird::tracks::TrackHandle;
use songbird::{Event, Songbird, TrackEvent};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct SongbirdVoice {
    songbird: Arc<Songbird>,
    volume: f32,
    // Handle of the track currently owned by each guild's call
    tracks: DashMap<GuildId, TrackHandle>,
}

impl SongbirdVoice {
    pub fn new(songbird: Arc<Songbird>, volume: f32) -> Self {
        Self {
            songbird,
            volume,
            tracks: DashMap::new(),
        }
    }

    fn current_track(&self, guild_id: GuildId) -> MusicResult<TrackHandle> {
        self.tracks
            .get(&guild_id)
            .map(|track| track.clone())
            .ok_or(MusicError::NothingPlaying)
    }
}

fn join_error(err: JoinError) -> MusicError {
    match err {
        JoinError::TimedOut => MusicError::JoinTimeout,
        other => MusicError::JoinError(other.to_string()),
    }
}

#[async_trait]
impl VoicePlatform<Input> for SongbirdVoice {
    async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> MusicResult<()> {
        self.songbird
            .join(guild_id, channel_id)
            .await
            .map(|_| ())
            .map_err(join_error)
    }

    async fn leave(&self, guild_id: GuildId) -> MusicResult<()> {
        self.tracks.remove(&guild_id);

        if self.songbird.get(guild_id).is_none() {
            return Err(MusicError::NotConnected);
        }

        self.songbird
            .remove(guild_id)
            .await
            .map_err(|e| MusicError::JoinError(format!("Failed to leave voice channel: {e}")))
    }

    async fn play(
        &self,
        guild_id: GuildId,
        stream: Input,
        on_end: TrackEndSender,
    ) -> MusicResult<()> {
        let call = self.songbird.get(guild_id).ok_or(MusicError::NotConnected)?;

        let track = {
            let mut handler = call.lock().await;
            handler.play_only_input(stream)
        };

        if let Err(e) = track.set_volume(self.volume) {
            warn!("Failed to set volume in guild {}: {}", guild_id, e);
        }

        for event in [TrackEvent::End, TrackEvent::Error] {
            track
                .add_event(
                    Event::Track(event),
                    TrackEndNotifier {
                        guild_id,
                        on_end: on_end.clone(),
                    },
                )
                .map_err(|e| MusicError::PlaybackError(e.to_string()))?;
        }

        debug!("Track handle created for guild {}", guild_id);
        self.tracks.insert(guild_id, track);
        Ok(())
    }

    async fn pause(&self, guild_id: GuildId) -> MusicResult<()> {
        self.current_track(guild_id)?
            .pause()
            .map_err(|e| MusicError::PlaybackError(e.to_string()))
    }

    async fn resume(&self, guild_id: GuildId) -> MusicResult<()> {
        self.current_track(guild_id)?
            .play()
            .map_err(|e| MusicError::PlaybackError(e.to_string()))
    }

    async fn stop(&self, guild_id: GuildId) -> MusicResult<()> {
        let Some((_, track)) = self.tracks.remove(&guild_id) else {
            return Ok(());
        };

        match track.stop() {
            Ok(()) | Err(songbird::error::ControlError::Finished) => Ok(()),
            Err(e) => Err(MusicError::PlaybackError(e.to_string())),
        }
    }
}
