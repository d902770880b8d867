//! This module defines the interface the music subsystem uses to find tracks
//! and to turn a track description into something the voice platform can play.

/// Submodule defining the `TrackMetadata` struct used across audio sources.
pub mod track_metadata;
/// Submodule implementing `MediaResolver` on top of `yt-dlp` and songbird.
#[cfg(feature = "music")]
pub mod youtube;

use crate::commands::music::utils::music_manager::MusicResult;
use serenity::async_trait;
use track_metadata::TrackMetadata;
use url::Url;

/// How many results a search should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Keywords yield their first match; a URL yields every entry it points to
    /// (a whole playlist, unbounded).
    FirstMatch,
    /// Keywords yield up to `n` matches to pick from.
    Interactive(usize),
}

/// Search and stream preparation backend.
///
/// `S` is the stream handle type understood by the matching `VoicePlatform`.
#[async_trait]
pub trait MediaResolver<S: Send + 'static>: Send + Sync {
    /// Flat (non-recursive) search. No match is an empty `Vec`, not an error.
    async fn search(&self, query: &str, mode: SearchMode) -> MusicResult<Vec<TrackMetadata>>;

    /// Prepare a playable stream for `track`, or `None` when the source is gone
    /// or unreachable.
    async fn resolve_stream(&self, track: &TrackMetadata) -> Option<S>;
}

/// A utility struct providing general helper functions related to audio sources.
pub struct AudioSource;

impl AudioSource {
    /// Performs a basic check if the input string can be parsed as an http(s) URL.
    pub fn is_url(input: &str) -> bool {
        Url::parse(input).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
    }
}
