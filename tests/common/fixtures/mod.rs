//! Sample guilds, channels and tracks shared by the integration tests.

use discord_bot::commands::music::audio_sources::track_metadata::TrackMetadata;
use discord_bot::commands::music::utils::voice::RequestContext;
use discord_bot::config::MusicSettings;
use fake::Fake;
use fake::faker::name::en::Name;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::time::Duration;

pub const GUILD: GuildId = GuildId::new(1_000);
pub const TEXT_CHANNEL: ChannelId = ChannelId::new(2_000);
pub const VOICE_CHANNEL: ChannelId = ChannelId::new(3_000);
pub const OTHER_VOICE_CHANNEL: ChannelId = ChannelId::new(3_001);
pub const USER: UserId = UserId::new(4_000);

pub fn settings() -> MusicSettings {
    MusicSettings {
        inactivity_timeout: Duration::from_secs(600),
        poll_interval: Duration::from_secs(30),
        ..MusicSettings::default()
    }
}

/// Someone asking from the test guild's text channel.
pub fn requester() -> RequestContext {
    RequestContext {
        guild_id: GUILD,
        channel_id: TEXT_CHANNEL,
        user_id: USER,
        user_name: Name().fake(),
    }
}

pub fn track(title: &str, secs: u64) -> TrackMetadata {
    TrackMetadata::new(
        title,
        format!("https://www.youtube.com/watch?v={}", title.replace(' ', "_")),
        secs,
    )
}

/// Tracks paired with the requester, ready for `SessionHandle::enqueue`.
pub fn requested(tracks: &[(&str, u64)]) -> Vec<(TrackMetadata, RequestContext)> {
    tracks
        .iter()
        .map(|(title, secs)| (track(title, *secs), requester()))
        .collect()
}
