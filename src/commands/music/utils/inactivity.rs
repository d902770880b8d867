//! Background watchdog disconnecting a voice session after sustained inactivity.

use super::session::SessionStatus;
use crate::config::MusicSettings;
use serenity::model::id::GuildId;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Idle time accounting, one observation per poll.
#[derive(Debug, Clone)]
pub struct IdleTracker {
    interval: Duration,
    timeout: Duration,
    idle: Duration,
}

impl IdleTracker {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval,
            timeout,
            idle: Duration::ZERO,
        }
    }

    /// Record one poll. Returns `true` once accrued idle time reaches the timeout.
    pub fn observe(&mut self, is_idle: bool) -> bool {
        if is_idle {
            self.idle += self.interval;
        } else {
            self.idle = Duration::ZERO;
        }
        self.idle >= self.timeout
    }

    pub fn accrued(&self) -> Duration {
        self.idle
    }
}

/// Start polling `status` every `poll_interval`. `on_timeout` runs at most
/// once; the task ends on its own as soon as the session is no longer
/// connected or the session went away.
pub fn spawn_watchdog<F>(
    guild_id: GuildId,
    settings: &MusicSettings,
    status: watch::Receiver<SessionStatus>,
    on_timeout: F,
) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    let interval = settings.poll_interval;
    let mut tracker = IdleTracker::new(interval, settings.inactivity_timeout);

    tokio::spawn(async move {
        info!("Starting inactivity watchdog for guild {}", guild_id);
        loop {
            tokio::time::sleep(interval).await;

            if status.has_changed().is_err() {
                debug!("Session of guild {} is gone, stopping watchdog", guild_id);
                break;
            }

            let current = status.borrow().clone();
            if !current.voice.is_connected() {
                debug!("Guild {} is no longer connected, stopping watchdog", guild_id);
                break;
            }

            let expired = tracker.observe(current.is_idle());
            debug!(
                "Guild {} idle for {:?} (playback: {:?}, queued: {})",
                guild_id,
                tracker.accrued(),
                current.playback,
                current.queue_len
            );

            if expired {
                info!(
                    "Guild {} inactive for {:?}, disconnecting",
                    guild_id,
                    tracker.accrued()
                );
                on_timeout();
                break;
            }
        }
    })
}
