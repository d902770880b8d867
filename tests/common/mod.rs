//! Common test utilities, fixtures, and mocks
//! This module contains shared functionality used across different test categories

pub mod fixtures;

use discord_bot::commands::music::utils::music_manager::{MusicManager, SessionHandle};
use discord_bot::commands::music::utils::session::SessionStatus;
use fixtures::{GUILD, settings};
use mocks::{FakePlatform, FakeResolver, FakeStream, RecordingNotifier};
use std::sync::Arc;
use std::time::Duration;

/// A music manager wired to in-memory collaborators.
pub struct Harness {
    pub manager: MusicManager<FakeStream>,
    pub platform: Arc<FakePlatform>,
    pub resolver: Arc<FakeResolver>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new() -> Self {
        crate::test_utils::init();

        let platform = Arc::new(FakePlatform::default());
        let resolver = Arc::new(FakeResolver::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let manager = MusicManager::new(
            platform.clone(),
            resolver.clone(),
            notifier.clone(),
            settings(),
        );

        Self {
            manager,
            platform,
            resolver,
            notifier,
        }
    }

    pub fn session(&self) -> SessionHandle<FakeStream> {
        self.manager.session(GUILD)
    }
}

/// Let every spawned task run until the runtime has nothing left to do.
///
/// Meant for `start_paused` tests: the clock only moves once all tasks are
/// parked, so this returns after pending work has drained.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Wait until the published status satisfies `predicate`, failing after a
/// few virtual seconds.
pub async fn wait_for<F>(session: &SessionHandle<FakeStream>, predicate: F) -> SessionStatus
where
    F: Fn(&SessionStatus) -> bool,
{
    let mut status = session.subscribe();
    let found = tokio::time::timeout(Duration::from_secs(5), status.wait_for(|s| predicate(s)))
        .await
        .expect("status never reached the expected state")
        .expect("session closed")
        .clone();
    found
}

/// Directory holding recorded tool output used by the tests.
pub fn fixtures_path() -> std::path::PathBuf {
    let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("common");
    path.push("fixtures");
    path
}
