use crate::common::fixtures::{
    GUILD, OTHER_VOICE_CHANNEL, VOICE_CHANNEL, requested, requester, settings,
};
use crate::common::mocks::{FakeResolver, MockVoice, VoiceCall};
use crate::common::{Harness, settle, wait_for};
use assert_matches::assert_matches;
use discord_bot::commands::music::utils::music_manager::{MusicError, MusicManager};
use discord_bot::commands::music::utils::session::{ConnectOutcome, PlaybackStatus, VoiceState};
use discord_bot::commands::music::utils::voice::{
    DisconnectReason, PlaybackNotice, PresenceChange, SilentNotifier,
};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[tokio::test(start_paused = true)]
async fn join_timeout_leaves_the_session_disconnected() {
    crate::test_utils::init();

    let mut voice = MockVoice::new();
    voice
        .expect_join()
        .with(eq(GUILD), eq(VOICE_CHANNEL))
        .times(1)
        .returning(|_, _| Err(MusicError::JoinTimeout));
    voice.expect_leave().never();
    voice.expect_play().never();

    let manager = MusicManager::new(
        Arc::new(voice),
        Arc::new(FakeResolver::default()),
        Arc::new(SilentNotifier),
        settings(),
    );
    let session = manager.session(GUILD);

    session
        .enqueue(requested(&[("Song A", 60)]))
        .await
        .unwrap();
    let result = session.connect(VOICE_CHANNEL, requester()).await;

    assert_eq!(result, Err(MusicError::JoinTimeout));
    let status = session.status();
    assert_eq!(status.voice, VoiceState::Disconnected);
    assert_eq!(status.playback, PlaybackStatus::Idle);
    assert_eq!(status.queue_len, 1);
}

#[tokio::test(start_paused = true)]
async fn failed_join_can_be_retried() {
    let harness = Harness::new();
    harness
        .platform
        .fail_joins(vec![MusicError::JoinError("gateway hiccup".into())]);
    let session = harness.session();

    assert_matches!(
        session.connect(VOICE_CHANNEL, requester()).await,
        Err(MusicError::JoinError(_))
    );
    assert_eq!(
        session.connect(VOICE_CHANNEL, requester()).await,
        Ok(ConnectOutcome::Joined)
    );
    assert_eq!(harness.platform.count(&VoiceCall::Join(VOICE_CHANNEL)), 2);
}

#[tokio::test(start_paused = true)]
async fn connect_reports_joins_moves_and_no_ops() {
    let harness = Harness::new();
    let session = harness.session();

    assert_eq!(
        session.connect(VOICE_CHANNEL, requester()).await,
        Ok(ConnectOutcome::Joined)
    );
    assert_eq!(
        session.connect(VOICE_CHANNEL, requester()).await,
        Ok(ConnectOutcome::AlreadyConnected)
    );
    assert_eq!(
        session.connect(OTHER_VOICE_CHANNEL, requester()).await,
        Ok(ConnectOutcome::Moved)
    );

    assert_eq!(session.status().voice, VoiceState::Connected(OTHER_VOICE_CHANNEL));
    assert_eq!(
        harness.platform.calls(),
        vec![
            VoiceCall::Join(VOICE_CHANNEL),
            VoiceCall::Join(OTHER_VOICE_CHANNEL)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn being_kicked_clears_the_queue() {
    let harness = Harness::new();
    let session = harness.session();
    session.connect(VOICE_CHANNEL, requester()).await.unwrap();
    session
        .enqueue(requested(&[("Song A", 60), ("Song B", 60), ("Song C", 60)]))
        .await
        .unwrap();
    wait_for(&session, |status| {
        matches!(status.playback, PlaybackStatus::Playing(_))
    })
    .await;

    harness
        .manager
        .handle_bot_voice_update(GUILD, PresenceChange::Left(VOICE_CHANNEL));
    let status = wait_for(&session, |status| status.voice == VoiceState::Disconnected).await;
    settle().await;

    assert_eq!(status.queue_len, 0);
    assert_eq!(status.playback, PlaybackStatus::Idle);
    assert_eq!(
        harness.notifier.notices().last(),
        Some(&PlaybackNotice::Disconnected(DisconnectReason::Platform))
    );
}

#[tokio::test(start_paused = true)]
async fn leave_of_a_previous_channel_is_ignored() {
    let harness = Harness::new();
    let session = harness.session();
    session.connect(VOICE_CHANNEL, requester()).await.unwrap();
    session
        .connect(OTHER_VOICE_CHANNEL, requester())
        .await
        .unwrap();

    harness
        .manager
        .handle_bot_voice_update(GUILD, PresenceChange::Left(VOICE_CHANNEL));
    settle().await;

    assert_eq!(session.status().voice, VoiceState::Connected(OTHER_VOICE_CHANNEL));
    assert_eq!(harness.platform.count(&VoiceCall::Leave), 0);
}

#[tokio::test(start_paused = true)]
async fn being_dragged_updates_the_channel() {
    let harness = Harness::new();
    let session = harness.session();
    session.connect(VOICE_CHANNEL, requester()).await.unwrap();

    harness
        .manager
        .handle_bot_voice_update(GUILD, PresenceChange::Moved(OTHER_VOICE_CHANNEL));
    let status = wait_for(&session, |status| {
        status.voice == VoiceState::Connected(OTHER_VOICE_CHANNEL)
    })
    .await;
    assert!(status.voice.is_connected());
}

#[tokio::test(start_paused = true)]
async fn disconnect_stops_playback_and_drops_the_queue() {
    let harness = Harness::new();
    let session = harness.session();
    session.connect(VOICE_CHANNEL, requester()).await.unwrap();
    session
        .enqueue(requested(&[("Song A", 60), ("Song B", 60)]))
        .await
        .unwrap();
    wait_for(&session, |status| {
        matches!(status.playback, PlaybackStatus::Playing(_))
    })
    .await;

    session.disconnect().await.unwrap();
    settle().await;

    let status = session.status();
    assert_eq!(status.voice, VoiceState::Disconnected);
    assert_eq!(status.queue_len, 0);
    assert_eq!(status.playback, PlaybackStatus::Idle);
    assert_eq!(harness.platform.count(&VoiceCall::Stop), 1);
    assert_eq!(harness.platform.count(&VoiceCall::Leave), 1);
    // Leaving on request is answered by the command itself.
    assert_eq!(harness.notifier.now_playing(), vec!["Song A"]);
    assert_eq!(harness.notifier.notices().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn sessions_are_created_on_first_use() {
    let harness = Harness::new();
    assert!(harness.manager.existing_session(GUILD).is_none());

    let first = harness.session();
    assert!(!first.is_closed());
    assert_eq!(first.guild_id(), GUILD);
    assert!(harness.manager.existing_session(GUILD).is_some());
}
