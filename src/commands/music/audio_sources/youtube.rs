//! Implements `MediaResolver` on top of the `yt-dlp` command-line tool.
//! Searches run `yt-dlp -J --flat-playlist`; streams are songbird `YoutubeDl`
//! inputs, probed once before being handed to the driver.

use super::{AudioSource, MediaResolver, SearchMode, TrackMetadata};
use crate::commands::music::utils::music_manager::{MusicError, MusicResult};
use serde::Deserialize;
use serenity::async_trait;
use songbird::input::{Compose, Input, YoutubeDl};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// One node of `yt-dlp -J` output: a video, or a playlist / search result
/// holding `entries`.
#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    id: Option<String>,
    title: Option<String>,
    webpage_url: Option<String>,
    url: Option<String>,
    duration: Option<f64>,
    thumbnail: Option<String>,
    thumbnails: Option<Vec<YtDlpThumbnail>>,
    entries: Option<Vec<Option<YtDlpInfo>>>,
}

#[derive(Debug, Deserialize)]
struct YtDlpThumbnail {
    url: String,
}

impl YtDlpInfo {
    fn into_tracks(self) -> Vec<TrackMetadata> {
        match self.entries {
            Some(entries) => entries
                .into_iter()
                .flatten()
                .flat_map(YtDlpInfo::into_tracks)
                .collect(),
            None => self.into_track().into_iter().collect(),
        }
    }

    fn into_track(self) -> Option<TrackMetadata> {
        let title = self.title?;
        // Flat entries only carry the watch page in `url`.
        let url = self
            .webpage_url
            .or(self.url.filter(|url| AudioSource::is_url(url)))
            .or_else(|| {
                self.id
                    .map(|id| format!("https://www.youtube.com/watch?v={id}"))
            })?;
        let thumbnail = self.thumbnail.or_else(|| {
            self.thumbnails
                .and_then(|thumbnails| thumbnails.into_iter().last())
                .map(|thumbnail| thumbnail.url)
        });

        let duration = self
            .duration
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(|secs| Duration::from_secs(secs.round() as u64))
            .unwrap_or_default();

        Some(TrackMetadata {
            title,
            url,
            duration,
            thumbnail,
        })
    }
}

/// Parse the JSON printed by `yt-dlp -J`. Entries yt-dlp could not extract
/// come back as `null` and are dropped.
pub fn parse_search_output(stdout: &[u8]) -> MusicResult<Vec<TrackMetadata>> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let info: YtDlpInfo = serde_json::from_slice(stdout).map_err(|e| {
        MusicError::AudioSourceError(format!("Failed to parse video metadata: {e}"))
    })?;
    Ok(info.into_tracks())
}

/// What to hand to yt-dlp for `query`.
pub fn search_target(query: &str, mode: SearchMode) -> String {
    let query = query.trim();
    if AudioSource::is_url(query) {
        return query.to_string();
    }
    match mode {
        SearchMode::FirstMatch => format!("ytsearch1:{query}"),
        SearchMode::Interactive(limit) => format!("ytsearch{}:{query}", limit.max(1)),
    }
}

pub struct YtDlpResolver {
    http: reqwest::Client,
}

impl YtDlpResolver {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MediaResolver<Input> for YtDlpResolver {
    async fn search(&self, query: &str, mode: SearchMode) -> MusicResult<Vec<TrackMetadata>> {
        let target = search_target(query, mode);
        info!("Searching yt-dlp for: {}", target);

        let output = Command::new("yt-dlp")
            .args(["-J", "--flat-playlist", "--ignore-errors", "--no-warnings"])
            .arg(&target)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MusicError::AudioSourceError(format!("Failed to run yt-dlp: {e}")))?;

        if !output.status.success() {
            warn!(
                "yt-dlp exited with {} for {}: {}",
                output.status,
                target,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            if output.stdout.is_empty() {
                return Ok(Vec::new());
            }
        }

        let mut tracks = parse_search_output(&output.stdout)?;
        if let SearchMode::Interactive(limit) = mode {
            tracks.truncate(limit);
        }
        debug!("yt-dlp returned {} tracks for {}", tracks.len(), target);
        Ok(tracks)
    }

    async fn resolve_stream(&self, track: &TrackMetadata) -> Option<Input> {
        let mut source = YoutubeDl::new(self.http.clone(), track.url.clone());

        // Probe now so a dead link is skipped instead of played as silence.
        match source.aux_metadata().await {
            Ok(_) => Some(source.into()),
            Err(e) => {
                warn!("Failed to create audio input for URL {}: {}", track.url, e);
                None
            }
        }
    }
}
