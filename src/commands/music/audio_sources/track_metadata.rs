//! Defines the `TrackMetadata` struct, the lightweight description of a playable
//! track as returned by a media search, before any stream is opened.

use std::time::Duration;

/// Metadata of one playable item. Never mutated once produced by a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackMetadata {
    /// The title of the track.
    pub title: String,
    /// Where the stream can be resolved from (e.g. a YouTube watch URL).
    pub url: String,
    /// Length of the track, in whole seconds.
    pub duration: Duration,
    /// URL to a thumbnail image for the track, if available.
    pub thumbnail: Option<String>,
}

impl TrackMetadata {
    pub fn new(title: impl Into<String>, url: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            duration: Duration::from_secs(duration_secs),
            thumbnail: None,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }
}
