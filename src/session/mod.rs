//! Session entities and per-session bookkeeping.
//!
//! This module contains the stateful heart of the provider:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Session`] | One remote browser session (handle + bookkeeping) |
//! | [`SessionState`] | Lifecycle state machine |
//! | [`SessionRegistry`] | id → session table |
//! | [`KeepAliveScheduler`] | Periodic no-op pings against idle timeout |
//!
//! # Lifecycle
//!
//! ```text
//! Starting ──init ok──▶ Active ──close──▶ Closing ──▶ Closed
//!     │                                                (removed)
//!     └──init/get err──▶ Failed (removed)
//! ```
//!
//! A session is created in `Starting` when open is requested and registered
//! before `init` is issued. The remote handshake is the awaited `init`
//! future; once it resolves the session holds its grid-assigned identifier
//! and its keep-alive timer, and is `Active`. `Failed` and `Closed` are
//! terminal; the registry entry is removed on either transition.

// ============================================================================
// Submodules
// ============================================================================

/// Keep-alive ping scheduling.
pub mod keepalive;

/// The id → session table.
pub mod registry;

pub use keepalive::{KeepAliveHandle, KeepAliveScheduler, PING_INTERVAL};
pub use registry::SessionRegistry;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::identifiers::{BrowserId, RemoteSessionId};
use crate::remote::{Capabilities, RemoteSessionClient};

// ============================================================================
// SessionState
// ============================================================================

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Open requested; remote handshake not yet complete.
    Starting,
    /// Remote handshake complete; keep-alive running.
    Active,
    /// Close requested; teardown in progress.
    Closing,
    /// Teardown complete (remote quit acknowledged or skipped).
    Closed,
    /// Start never completed.
    Failed,
}

impl SessionState {
    /// Returns `true` for terminal states.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Starting => "starting",
            Self::Active => "active",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a session.
struct SessionInner {
    /// Logical browser id, runner-supplied.
    id: BrowserId,

    /// Remote session handle bound to this id.
    remote: Arc<dyn RemoteSessionClient>,

    /// Capability payload used at session start. Immutable once set.
    capabilities: Capabilities,

    /// Grid-assigned session identifier; absent until the handshake resolves.
    remote_session_id: Mutex<Option<RemoteSessionId>>,

    /// Keep-alive timer handle; present iff the session is Active.
    keep_alive: Mutex<Option<KeepAliveHandle>>,

    /// Lifecycle state.
    state: Mutex<SessionState>,

    /// Dashboard log URL recorded as user-agent metadata, if any.
    user_agent_meta: Mutex<Option<String>>,
}

// ============================================================================
// Session
// ============================================================================

/// A handle to one remote browser session.
///
/// Cheap to clone; all clones share the same bookkeeping. Interior locks are
/// never held across `.await`: remote calls take an owned clone of the
/// client handle first.
#[derive(Clone)]
pub struct Session {
    /// Shared inner state.
    inner: Arc<SessionInner>,
}

// ============================================================================
// Session - Display
// ============================================================================

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id)
            .field("remote_session_id", &*self.inner.remote_session_id.lock())
            .field("state", &*self.inner.state.lock())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Session - Constructor
// ============================================================================

impl Session {
    /// Creates a session in the `Starting` state.
    pub fn new(
        id: BrowserId,
        remote: Arc<dyn RemoteSessionClient>,
        capabilities: Capabilities,
    ) -> Self {
        debug!(id = %id, "Session created");
        Self {
            inner: Arc::new(SessionInner {
                id,
                remote,
                capabilities,
                remote_session_id: Mutex::new(None),
                keep_alive: Mutex::new(None),
                state: Mutex::new(SessionState::Starting),
                user_agent_meta: Mutex::new(None),
            }),
        }
    }
}

// ============================================================================
// Session - Accessors
// ============================================================================

impl Session {
    /// Returns the logical browser id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &BrowserId {
        &self.inner.id
    }

    /// Returns an owned handle to the remote session client.
    #[inline]
    #[must_use]
    pub fn remote(&self) -> Arc<dyn RemoteSessionClient> {
        Arc::clone(&self.inner.remote)
    }

    /// Returns the capability payload used at session start.
    #[inline]
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.inner.capabilities
    }

    /// Returns the grid-assigned session identifier, if the handshake has
    /// resolved.
    #[inline]
    #[must_use]
    pub fn remote_session_id(&self) -> Option<RemoteSessionId> {
        self.inner.remote_session_id.lock().clone()
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.inner.state.lock()
    }

    /// Returns `true` if a keep-alive timer is attached.
    #[inline]
    #[must_use]
    pub fn has_keep_alive(&self) -> bool {
        self.inner.keep_alive.lock().is_some()
    }

    /// Returns the recorded user-agent metadata (dashboard log URL), if any.
    #[inline]
    #[must_use]
    pub fn user_agent_meta(&self) -> Option<String> {
        self.inner.user_agent_meta.lock().clone()
    }
}

// ============================================================================
// Session - Transitions
// ============================================================================

impl Session {
    /// Records the handshake result and moves the session to `Active`.
    ///
    /// The identifier is set exactly once; a second call is a logged no-op
    /// (the handshake future resolves once, so this only fires on misuse).
    pub fn mark_active(&self, remote_session_id: RemoteSessionId) {
        let mut slot = self.inner.remote_session_id.lock();
        if slot.is_some() {
            warn!(id = %self.inner.id, "Remote session id already recorded; ignoring");
            return;
        }

        debug!(id = %self.inner.id, remote_session_id = %remote_session_id, "Session active");
        *slot = Some(remote_session_id);
        *self.inner.state.lock() = SessionState::Active;
    }

    /// Moves the session to a new lifecycle state.
    pub fn set_state(&self, state: SessionState) {
        let mut slot = self.inner.state.lock();
        debug!(id = %self.inner.id, from = %*slot, to = %state, "Session state change");
        *slot = state;
    }

    /// Attaches the keep-alive timer handle.
    ///
    /// Called once per session, after the handshake resolves.
    pub(crate) fn attach_keep_alive(&self, handle: KeepAliveHandle) {
        let mut slot = self.inner.keep_alive.lock();
        if slot.is_some() {
            warn!(id = %self.inner.id, "Keep-alive already attached; ignoring");
            return;
        }
        *slot = Some(handle);
    }

    /// Detaches the keep-alive timer handle, if attached.
    pub(crate) fn take_keep_alive(&self) -> Option<KeepAliveHandle> {
        self.inner.keep_alive.lock().take()
    }

    /// Records the dashboard log URL as user-agent metadata.
    pub fn set_user_agent_meta(&self, meta: impl Into<String>) {
        *self.inner.user_agent_meta.lock() = Some(meta.into());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use crate::error::Result;

    struct NullClient;

    #[async_trait]
    impl RemoteSessionClient for NullClient {
        async fn init(&self, _capabilities: &Capabilities) -> Result<RemoteSessionId> {
            Ok(RemoteSessionId::new("null"))
        }
        async fn get(&self, _url: &str) -> Result<()> {
            Ok(())
        }
        async fn eval(&self, _expression: &str) -> Result<Value> {
            Ok(Value::Null)
        }
        async fn window_handle(&self) -> Result<String> {
            Ok("w0".into())
        }
        async fn window_size(&self, _handle: &str, _width: u32, _height: u32) -> Result<()> {
            Ok(())
        }
        async fn maximize(&self, _handle: &str) -> Result<()> {
            Ok(())
        }
        async fn take_screenshot(&self) -> Result<String> {
            Ok(String::new())
        }
        async fn quit(&self) -> Result<()> {
            Ok(())
        }
    }

    fn session() -> Session {
        Session::new(
            BrowserId::new("b1"),
            Arc::new(NullClient),
            Capabilities::new(json!({"browser": "chrome"})),
        )
    }

    #[test]
    fn test_new_session_is_starting() {
        let s = session();
        assert_eq!(s.state(), SessionState::Starting);
        assert!(s.remote_session_id().is_none());
        assert!(!s.has_keep_alive());
    }

    #[test]
    fn test_mark_active_records_id_once() {
        let s = session();
        s.mark_active(RemoteSessionId::new("abc123"));

        assert_eq!(s.state(), SessionState::Active);
        assert_eq!(s.remote_session_id(), Some(RemoteSessionId::new("abc123")));

        // Second call must not overwrite.
        s.mark_active(RemoteSessionId::new("other"));
        assert_eq!(s.remote_session_id(), Some(RemoteSessionId::new("abc123")));
    }

    #[test]
    fn test_terminal_states() {
        assert!(SessionState::Closed.is_terminal());
        assert!(SessionState::Failed.is_terminal());
        assert!(!SessionState::Starting.is_terminal());
        assert!(!SessionState::Active.is_terminal());
        assert!(!SessionState::Closing.is_terminal());
    }

    #[test]
    fn test_user_agent_meta_roundtrip() {
        let s = session();
        assert!(s.user_agent_meta().is_none());
        s.set_user_agent_meta("https://dash.example/logs/?sessionID=abc123");
        assert_eq!(
            s.user_agent_meta().as_deref(),
            Some("https://dash.example/logs/?sessionID=abc123")
        );
    }

    #[test]
    fn test_session_is_clone_and_shares_state() {
        let s = session();
        let clone = s.clone();
        s.mark_active(RemoteSessionId::new("abc123"));
        assert_eq!(
            clone.remote_session_id(),
            Some(RemoteSessionId::new("abc123"))
        );
    }
}
