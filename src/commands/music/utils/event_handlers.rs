use super::voice::TrackEndSender;
use serenity::all::GuildId;
use serenity::async_trait;
use songbird::tracks::PlayMode;
use songbird::{Event, EventContext, EventHandler};
use tracing::{debug, warn};

/// Event handler for when a track ends or errors.
///
/// Registered for both `TrackEvent::End` and `TrackEvent::Error`; the session
/// ignores whichever report arrives second.
pub struct TrackEndNotifier {
    pub guild_id: GuildId,
    pub on_end: TrackEndSender,
}

#[async_trait]
impl EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(tracks) = ctx {
            let error = tracks.iter().find_map(|(state, _)| match &state.playing {
                PlayMode::Errored(err) => Some(format!("{err:?}")),
                _ => None,
            });

            match &error {
                Some(err) => warn!("Track errored in guild {}: {}", self.guild_id, err),
                None => debug!("Track ended for guild {}", self.guild_id),
            }
            self.on_end.finished(error);
        }
        None
    }
}
