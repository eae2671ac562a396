//! Keep-alive ping scheduling.
//!
//! The grid expires idle sessions, so each active session runs a recurring
//! no-op `eval("")` against its remote handle. The scheduler owns the timer
//! policy; the per-session timer lives on the [`Session`] as a
//! [`KeepAliveHandle`].
//!
//! Ping failures are logged and ignored: a flaky ping must neither cancel
//! the session nor let an error escape the timer task.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, trace, warn};

use super::Session;

// ============================================================================
// Constants
// ============================================================================

/// Interval between keep-alive pings.
pub const PING_INTERVAL: Duration = Duration::from_secs(30);

// ============================================================================
// KeepAliveHandle
// ============================================================================

/// Owned handle to one session's recurring ping task.
///
/// Aborts the task when dropped, so a session torn down without an explicit
/// stop cannot leak its timer.
#[derive(Debug)]
pub struct KeepAliveHandle {
    /// The spawned ping task.
    task: JoinHandle<()>,
}

impl KeepAliveHandle {
    /// Stops the ping task.
    #[inline]
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Returns `true` if the ping task has stopped.
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for KeepAliveHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ============================================================================
// KeepAliveScheduler
// ============================================================================

/// Starts and stops per-session keep-alive timers.
#[derive(Debug, Clone)]
pub struct KeepAliveScheduler {
    /// Interval between pings.
    period: Duration,
}

impl Default for KeepAliveScheduler {
    fn default() -> Self {
        Self {
            period: PING_INTERVAL,
        }
    }
}

impl KeepAliveScheduler {
    /// Creates a scheduler with the default [`PING_INTERVAL`].
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler with a custom ping period.
    #[inline]
    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        Self { period }
    }

    /// Starts the recurring ping timer for a session.
    ///
    /// Must only be called after the remote handshake has resolved; the
    /// first ping fires one full period after start, never immediately.
    /// Calling start on a session that already has a timer is a logged
    /// no-op.
    pub fn start(&self, session: &Session) {
        if session.has_keep_alive() {
            warn!(id = %session.id(), "Keep-alive already running");
            return;
        }

        let remote = session.remote();
        let id = session.id().clone();
        let period = self.period;

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                match remote.eval("").await {
                    Ok(_) => trace!(id = %id, "Keep-alive ping"),
                    Err(e) => warn!(id = %id, error = %e, "Keep-alive ping failed"),
                }
            }
        });

        debug!(id = %session.id(), period_secs = period.as_secs(), "Keep-alive started");
        session.attach_keep_alive(KeepAliveHandle { task });
    }

    /// Cancels the session's ping timer.
    ///
    /// Idempotent: stopping a session that never started a timer is a
    /// logged no-op. Called exactly once per session during close or failed
    /// start.
    pub fn stop(&self, session: &Session) {
        match session.take_keep_alive() {
            Some(handle) => {
                handle.abort();
                debug!(id = %session.id(), "Keep-alive stopped");
            }
            None => {
                debug!(id = %session.id(), "Keep-alive was not running");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
