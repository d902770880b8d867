use super::music_manager::MusicError;
use super::session::{PlaybackStatus, QueueSnapshot};
use super::voice::DisconnectReason;
use super::{format_duration, truncate_title};
use crate::commands::help::Module;
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;
use crate::utils::embeds::module_embed;
use serenity::all::{CreateEmbed, Mentionable, UserId};
use std::time::Duration;

/// Rows listed in an "added" embed before the rest is summarized.
const MAX_LISTED_TRACKS: usize = 10;

/// Music response addressed to `user`.
pub fn response(user: UserId, title: &str, content: &str) -> CreateEmbed {
    module_embed(Module::Music, title, format!("{} {}", user.mention(), content), false)
}

/// Music error addressed to `user`.
pub fn error(user: UserId, title: &str, content: &str) -> CreateEmbed {
    module_embed(Module::Music, title, format!("{} {}", user.mention(), content), true)
}

/// What users are told when a music operation fails.
pub fn error_message(err: &MusicError) -> String {
    match err {
        MusicError::UserNotInVoiceChannel => "You need to be `connected` to a channel !".into(),
        MusicError::NotConnected => "The bot is currently not connected ...".into(),
        MusicError::NothingPlaying | MusicError::AlreadyPaused => {
            "The bot is not currently playing a song ...".into()
        }
        MusicError::NotPaused => "The bot is currently playing a song ...".into(),
        MusicError::JoinTimeout | MusicError::JoinError(_) => {
            "Failed to `connect` to your channel !".into()
        }
        MusicError::NotInGuild => "This command only works in a server ...".into(),
        other => format!("Something went wrong: {other}"),
    }
}

pub fn music_error(user: UserId, title: &str, err: &MusicError) -> CreateEmbed {
    error(user, title, &error_message(err))
}

fn track_rows(tracks: &[TrackMetadata]) -> (String, String) {
    let mut names = String::new();
    let mut durations = String::new();

    for (index, track) in tracks.iter().take(MAX_LISTED_TRACKS).enumerate() {
        names.push_str(&format!("`#{}` - `{}`\n", index + 1, truncate_title(&track.title)));
        durations.push_str(&format!("`{}`\n", format_duration(track.duration)));
    }
    if tracks.len() > MAX_LISTED_TRACKS {
        names.push_str(&format!("... and {} more\n", tracks.len() - MAX_LISTED_TRACKS));
    }

    (names, durations)
}

/// Response of `add` / `play` once tracks are queued.
pub fn added(user: UserId, tracks: &[TrackMetadata]) -> CreateEmbed {
    let plural = if tracks.len() > 1 { "s" } else { "" };
    let (names, durations) = track_rows(tracks);

    let mut embed = response(
        user,
        "Add",
        &format!("`Added` {} song{plural} to the queue !", tracks.len()),
    )
    .field(format!("Track{plural} Queued:"), names, true)
    .field(format!("Duration{plural}:"), durations, true);

    if let Some(thumbnail) = tracks.first().and_then(|track| track.thumbnail.clone()) {
        embed = embed.thumbnail(thumbnail);
    }
    embed
}

/// Results of `search`, to pick from in the attached menu.
pub fn search_results(user: UserId, tracks: &[TrackMetadata]) -> CreateEmbed {
    let (names, durations) = track_rows(tracks);
    response(user, "Search", "Pick the songs to `add` to the queue !")
        .field("Results:", names, true)
        .field("Durations:", durations, true)
}

pub fn now_playing(user: UserId, track: &TrackMetadata) -> CreateEmbed {
    let mut embed = response(
        user,
        "Now Playing",
        &format!("`Playing` [{}]({}) !", truncate_title(&track.title), track.url),
    )
    .field("Duration", format!("`{}`", format_duration(track.duration)), true);

    if let Some(thumbnail) = &track.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }
    embed
}

pub fn track_failed(user: UserId, track: &TrackMetadata) -> CreateEmbed {
    error(
        user,
        "Now Playing",
        &format!(
            "Could not play [{}]({}), skipping it ...",
            truncate_title(&track.title),
            track.url
        ),
    )
}

pub fn disconnected(user: UserId, reason: DisconnectReason, timeout: Duration) -> CreateEmbed {
    let content = match reason {
        DisconnectReason::Command => "`Disconnected` the bot !".to_string(),
        DisconnectReason::Inactivity => format!(
            "`Disconnected` after {} of inactivity !",
            format_duration(timeout)
        ),
        DisconnectReason::Platform => {
            "`Disconnected` from the voice channel, the queue was cleared !".to_string()
        }
    };
    response(user, "Disconnect", &content)
}

fn describe_playback(playback: &PlaybackStatus) -> String {
    let line = |state: &str, track: &TrackMetadata| {
        format!(
            "{state} [{}]({}) `{}`",
            truncate_title(&track.title),
            track.url,
            format_duration(track.duration)
        )
    };

    match playback {
        PlaybackStatus::Idle => "🔇 Nothing playing".to_string(),
        PlaybackStatus::Resolving(track) => line("⏳ Loading", track),
        PlaybackStatus::Playing(track) => line("▶️ Playing", track),
        PlaybackStatus::Paused(track) => line("⏸️ Paused", track),
    }
}

/// Queue overview of the `queue` command.
pub fn queue(user: UserId, snapshot: &QueueSnapshot) -> CreateEmbed {
    let mut description = describe_playback(&snapshot.playback);
    description.push_str("\n\n");

    if snapshot.upcoming.is_empty() {
        description.push_str("📭 The queue is `empty` ...");
    } else {
        for (index, entry) in snapshot.upcoming.iter().enumerate() {
            description.push_str(&format!(
                "`#{}` - `{}` `{}`\n",
                index + 1,
                truncate_title(&entry.track.title),
                format_duration(entry.track.duration)
            ));
        }
        let hidden = snapshot.queue_len.saturating_sub(snapshot.upcoming.len());
        if hidden > 0 {
            description.push_str(&format!("... and {hidden} more\n"));
        }
    }

    response(user, "Queue", &description).field(
        "Total:",
        format!(
            "`{}` song(s) - `{}`",
            snapshot.queue_len,
            format_duration(snapshot.total_duration)
        ),
        false,
    )
}
