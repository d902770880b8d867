use crate::common::fixtures_path;
use discord_bot::commands::music::audio_sources::SearchMode;
use discord_bot::commands::music::audio_sources::youtube::{parse_search_output, search_target};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn recorded_search() -> Vec<u8> {
    std::fs::read(fixtures_path().join("ytdlp_search.json")).unwrap()
}

#[test]
fn recorded_search_output_is_parsed() {
    let tracks = parse_search_output(&recorded_search()).unwrap();

    let titles: Vec<_> = tracks.iter().map(|track| track.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["lofi hip hop radio - beats to relax/study to", "Chill Study Beats"]
    );
}

#[test]
fn live_streams_have_no_duration_and_keep_the_largest_thumbnail() {
    let tracks = parse_search_output(&recorded_search()).unwrap();

    assert_eq!(tracks[0].duration, Duration::ZERO);
    assert_eq!(
        tracks[0].thumbnail.as_deref(),
        Some("https://i.ytimg.com/vi/jfKfPfyJRdk/hq720.jpg")
    );
}

#[test]
fn bare_ids_become_watch_urls() {
    let tracks = parse_search_output(&recorded_search()).unwrap();

    assert_eq!(tracks[1].url, "https://www.youtube.com/watch?v=5qap5aO4i9A");
    assert_eq!(tracks[1].duration, Duration::from_secs(3600));
}

#[test]
fn urls_are_passed_through_untouched() {
    let url = "https://www.youtube.com/playlist?list=PL123";
    assert_eq!(search_target(url, SearchMode::Interactive(5)), url);
    assert_eq!(search_target("lofi", SearchMode::Interactive(5)), "ytsearch5:lofi");
}
