//! External collaborator seams for the grid.
//!
//! Everything the session manager needs from the outside world is reachable
//! through the narrow traits in this module. The provider treats each of
//! them as a black box:
//!
//! | Trait | Responsibility |
//! |-------|----------------|
//! | [`RemoteSessionClient`] | One remote browser session on the grid |
//! | [`RemoteSessionFactory`] | Creates clients bound to hub + credentials |
//! | [`CapabilityResolver`] | Browser name → capability payload |
//! | [`GridTunnel`] | Process-wide tunnel/proxy connect and destroy |
//! | [`FileSaver`] | Persists base64 screenshot payloads |
//! | [`JobStatusReporter`] | Reports pass/fail for a finished session |
//! | [`BrowserListProvider`] | Supported browser names, fetched once |
//!
//! # Transport policy
//!
//! [`RemoteSessionFactory`] implementations own the wire transport. The
//! provider assumes reads wait indefinitely ([`TRANSPORT_READ_TIMEOUT`]) and
//! that automatic retries are disabled ([`TRANSPORT_AUTO_RETRIES`]); any
//! timeout or retry behavior belongs at the session-operation level, not in
//! the transport.

// ============================================================================
// Submodules
// ============================================================================

/// Disk-backed screenshot persistence.
pub mod files;

pub use files::DiskFileSaver;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::credentials::Credentials;
use crate::error::Result;
use crate::identifiers::{BrowserId, RemoteSessionId};

// ============================================================================
// Constants
// ============================================================================

/// Read timeout expected from the remote transport: none, wait indefinitely.
pub const TRANSPORT_READ_TIMEOUT: Option<Duration> = None;

/// Automatic wire-level retries expected from the remote transport: disabled.
pub const TRANSPORT_AUTO_RETRIES: bool = false;

// ============================================================================
// Capabilities
// ============================================================================

/// Resolved capability payload sent to the grid at session start.
///
/// Opaque to the session manager: produced by a [`CapabilityResolver`],
/// consumed verbatim by [`RemoteSessionClient::init`], immutable once set on
/// a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(Value);

impl Capabilities {
    /// Wraps a raw JSON capability object.
    #[inline]
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the underlying JSON payload.
    #[inline]
    #[must_use]
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Looks up a top-level capability field.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

// ============================================================================
// JobResultKind
// ============================================================================

/// Result-kind constants forwarded to the job-status endpoint.
///
/// Mirrors the runner's job-result constant set; the provider passes the
/// kind through unchanged alongside the textual result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobResultKind {
    /// The test job ran to completion.
    Done,
    /// The test job failed with an error.
    Errored,
    /// The test job was aborted before completion.
    Aborted,
}

impl JobResultKind {
    /// Returns the wire representation of this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Errored => "errored",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for JobResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RemoteSessionClient
// ============================================================================

/// One remote browser session hosted on the grid.
///
/// Every method is a suspension point; none are retried by the provider.
/// The handshake is modeled as the awaited [`init`](Self::init) future: it
/// resolves with the grid-assigned session identifier once the remote side
/// accepts the session, and nothing session-scoped (pings, navigation,
/// screenshots) is meaningful before that.
#[async_trait]
pub trait RemoteSessionClient: Send + Sync {
    /// Starts the remote session with the given capability payload.
    ///
    /// Resolves with the grid-assigned session identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote handshake is rejected or the wire
    /// transport fails.
    async fn init(&self, capabilities: &Capabilities) -> Result<RemoteSessionId>;

    /// Navigates the session to a URL.
    async fn get(&self, url: &str) -> Result<()>;

    /// Evaluates an expression remotely.
    ///
    /// The keep-alive scheduler issues `eval("")` as a no-op ping.
    async fn eval(&self, expression: &str) -> Result<Value>;

    /// Returns the current window handle.
    async fn window_handle(&self) -> Result<String>;

    /// Resizes the window identified by `handle`.
    async fn window_size(&self, handle: &str, width: u32, height: u32) -> Result<()>;

    /// Maximizes the window identified by `handle`.
    async fn maximize(&self, handle: &str) -> Result<()>;

    /// Captures a screenshot as a base64-encoded image.
    async fn take_screenshot(&self) -> Result<String>;

    /// Ends the remote session.
    async fn quit(&self) -> Result<()>;
}

// ============================================================================
// RemoteSessionFactory
// ============================================================================

/// Creates [`RemoteSessionClient`] instances bound to the hub endpoint.
///
/// Construction is cheap and local; no network traffic happens until
/// [`RemoteSessionClient::init`] is awaited.
pub trait RemoteSessionFactory: Send + Sync {
    /// Creates a client for one new session.
    fn create(&self, hub: &Url, credentials: &Credentials) -> Arc<dyn RemoteSessionClient>;
}

// ============================================================================
// CapabilityResolver
// ============================================================================

/// Turns a logical browser name into a capability payload.
#[async_trait]
pub trait CapabilityResolver: Send + Sync {
    /// Resolves capabilities for `(id, browser_name)`.
    ///
    /// # Errors
    ///
    /// Returns the resolver's own error; the provider propagates it
    /// verbatim after tearing down the process-wide connection.
    async fn resolve(&self, id: &BrowserId, browser_name: &str) -> Result<Capabilities>;
}

// ============================================================================
// GridTunnel
// ============================================================================

/// Process-wide tunnel/proxy connection to the grid.
///
/// A singleton shared by all sessions, held by the provider and passed by
/// context rather than reached through ambient module state. Both operations
/// are idempotent: `connect` on an established tunnel and `destroy` on a
/// torn-down tunnel are no-ops.
///
/// Teardown affects every session, not just the one whose open failed; a
/// capability-resolution failure for one id destroys the tunnel for all.
#[async_trait]
pub trait GridTunnel: Send + Sync {
    /// Establishes the process-wide connection if not already up.
    async fn connect(&self) -> Result<()>;

    /// Tears the process-wide connection down.
    async fn destroy(&self) -> Result<()>;
}

// ============================================================================
// FileSaver
// ============================================================================

/// Persists a base64 screenshot payload to a path.
#[async_trait]
pub trait FileSaver: Send + Sync {
    /// Saves `base64_data` (decoded) at `path`.
    async fn save(&self, path: &Path, base64_data: &str) -> Result<()>;
}

// ============================================================================
// JobStatusReporter
// ============================================================================

/// Reports the outcome of a finished session to the grid's job endpoint.
#[async_trait]
pub trait JobStatusReporter: Send + Sync {
    /// Updates job status for the session identified by `remote_session_id`.
    ///
    /// `job_data` is arbitrary runner-supplied metadata, passed through
    /// unchanged.
    async fn update(
        &self,
        remote_session_id: &RemoteSessionId,
        job_result: &str,
        job_data: &Value,
        kind: JobResultKind,
    ) -> Result<Value>;
}

// ============================================================================
// BrowserListProvider
// ============================================================================

/// Supplies the ordered list of browser names the grid supports.
///
/// Fetched once at provider initialization and cached for the process
/// lifetime.
#[async_trait]
pub trait BrowserListProvider: Send + Sync {
    /// Returns the supported browser names.
    async fn list(&self) -> Result<Vec<String>>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_capabilities_get() {
        let caps = Capabilities::new(json!({"browser": "chrome", "version": "latest"}));
        assert_eq!(caps.get("browser"), Some(&json!("chrome")));
        assert_eq!(caps.get("missing"), None);
    }

    #[test]
    fn test_capabilities_serialize_transparent() {
        let caps = Capabilities::new(json!({"browser": "chrome"}));
        let rendered = serde_json::to_string(&caps).unwrap();
        assert_eq!(rendered, r#"{"browser":"chrome"}"#);
    }

    #[test]
    fn test_job_result_kind_wire_strings() {
        assert_eq!(JobResultKind::Done.as_str(), "done");
        assert_eq!(JobResultKind::Errored.as_str(), "errored");
        assert_eq!(JobResultKind::Aborted.as_str(), "aborted");
    }

    #[test]
    fn test_transport_policy_constants() {
        assert!(TRANSPORT_READ_TIMEOUT.is_none());
        assert!(!TRANSPORT_AUTO_RETRIES);
    }
}
