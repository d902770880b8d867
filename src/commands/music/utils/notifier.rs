//! [`Notifier`] posting playback notices in the channel of the request.

use super::embedded_messages;
use super::voice::{Notifier, PlaybackNotice, RequestContext};
use crate::utils::communication::deliver;
use serenity::all::{CreateMessage, Http};
use serenity::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub struct SerenityNotifier {
    http: Arc<Http>,
    inactivity_timeout: Duration,
}

impl SerenityNotifier {
    pub fn new(http: Arc<Http>, inactivity_timeout: Duration) -> Self {
        Self {
            http,
            inactivity_timeout,
        }
    }
}

#[async_trait]
impl Notifier for SerenityNotifier {
    async fn notify(&self, context: &RequestContext, notice: PlaybackNotice) {
        let embed = match &notice {
            PlaybackNotice::NowPlaying(track) => {
                embedded_messages::now_playing(context.user_id, track)
            }
            PlaybackNotice::TrackFailed(track) => {
                embedded_messages::track_failed(context.user_id, track)
            }
            PlaybackNotice::Disconnected(reason) => {
                embedded_messages::disconnected(context.user_id, *reason, self.inactivity_timeout)
            }
        };

        if let Err(e) = deliver(&self.http, context, CreateMessage::new().embed(embed)).await {
            warn!(
                "Failed to send {:?} notice in channel {}: {}",
                notice, context.channel_id, e
            );
        }
    }
}
