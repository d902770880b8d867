use crate::common::fixtures::{VOICE_CHANNEL, requested, requester};
use crate::common::mocks::VoiceCall;
use crate::common::{Harness, settle};
use discord_bot::commands::music::utils::session::VoiceState;
use discord_bot::commands::music::utils::voice::{DisconnectReason, PlaybackNotice};
use pretty_assertions::assert_eq;
use std::time::Duration;

async fn advance_to(start: tokio::time::Instant, secs: u64) {
    tokio::time::sleep_until(start + Duration::from_secs(secs)).await;
    settle().await;
}

#[tokio::test(start_paused = true)]
async fn idle_session_disconnects_after_the_timeout() {
    let harness = Harness::new();
    let session = harness.session();
    let start = tokio::time::Instant::now();
    session.connect(VOICE_CHANNEL, requester()).await.unwrap();

    advance_to(start, 590).await;
    assert_eq!(session.status().voice, VoiceState::Connected(VOICE_CHANNEL));

    advance_to(start, 610).await;
    assert_eq!(session.status().voice, VoiceState::Disconnected);
    assert_eq!(harness.platform.count(&VoiceCall::Leave), 1);
    assert_eq!(
        harness.notifier.notices(),
        vec![PlaybackNotice::Disconnected(DisconnectReason::Inactivity)]
    );
}

#[tokio::test(start_paused = true)]
async fn playback_resets_the_idle_timer() {
    let harness = Harness::new();
    harness.platform.auto_finish();
    let session = harness.session();
    let start = tokio::time::Instant::now();

    session.connect(VOICE_CHANNEL, requester()).await.unwrap();
    session
        .enqueue(requested(&[("Long Song", 500)]))
        .await
        .unwrap();

    advance_to(start, 1_050).await;
    assert!(session.status().voice.is_connected());

    advance_to(start, 1_100).await;
    assert_eq!(session.status().voice, VoiceState::Disconnected);
    assert_eq!(harness.platform.played(), vec!["Long Song"]);
}

#[tokio::test(start_paused = true)]
async fn paused_track_does_not_keep_the_bot_around() {
    let harness = Harness::new();
    let session = harness.session();
    let start = tokio::time::Instant::now();

    session.connect(VOICE_CHANNEL, requester()).await.unwrap();
    session
        .enqueue(requested(&[("Song A", 3_600)]))
        .await
        .unwrap();
    settle().await;
    session.pause().await.unwrap();

    advance_to(start, 620).await;
    assert_eq!(session.status().voice, VoiceState::Disconnected);
    assert_eq!(session.status().queue_len, 0);
}

#[tokio::test(start_paused = true)]
async fn watchdog_of_an_old_connection_does_not_fire() {
    let harness = Harness::new();
    let session = harness.session();
    let start = tokio::time::Instant::now();

    session.connect(VOICE_CHANNEL, requester()).await.unwrap();
    advance_to(start, 300).await;
    session.disconnect().await.unwrap();
    session.connect(VOICE_CHANNEL, requester()).await.unwrap();

    // The first connection would have expired at 600s.
    advance_to(start, 880).await;
    assert!(session.status().voice.is_connected());

    advance_to(start, 910).await;
    assert_eq!(session.status().voice, VoiceState::Disconnected);
    assert_eq!(harness.platform.count(&VoiceCall::Leave), 2);
}
