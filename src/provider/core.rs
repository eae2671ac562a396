//! Core provider implementation.
//!
//! The [`Provider`] translates runner lifecycle calls (open a browser,
//! resize it, screenshot it, close it, report a job result) into remote
//! session operations, keeping per-session bookkeeping consistent across
//! concurrent sessions.
//!
//! # Open sequencing
//!
//! ```text
//! open_browser
//!   ├─ credentials present?          (Auth error, zero side effects)
//!   ├─ tunnel.connect()              (process-wide, idempotent)
//!   ├─ resolver.resolve(id, name)    (error → dispose + propagate)
//!   ├─ factory.create(hub, creds)
//!   ├─ registry.put(Starting)
//!   ├─ remote.init(caps)             (handshake; error → teardown)
//!   ├─ keep-alive start              (never before init resolves)
//!   ├─ remote.get(page_url)          (error → teardown)
//!   └─ record dashboard log URL      (best-effort)
//! ```
//!
//! # Concurrency
//!
//! Operations on different browser ids never block each other. Operations
//! on the same id are not mutually excluded: a close racing an in-flight
//! open can remove or overwrite the registry entry mid-flight, and two
//! concurrent opens for one id are last-writer-wins. Callers wanting
//! stronger guarantees must serialize per-id operations themselves.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::identifiers::BrowserId;
use crate::remote::{
    BrowserListProvider, CapabilityResolver, FileSaver, GridTunnel, JobResultKind,
    JobStatusReporter, RemoteSessionFactory,
};
use crate::session::{KeepAliveScheduler, Session, SessionRegistry, SessionState};

// ============================================================================
// Constants
// ============================================================================

/// Default grid hub endpoint.
pub const DEFAULT_HUB_URL: &str = "https://hub.gridhost.io/wd/hub";

/// Default dashboard base URL for session log links.
pub const DEFAULT_DASHBOARD_URL: &str = "https://automation.gridhost.io";

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the provider.
pub(crate) struct ProviderInner {
    /// Grid credentials; absence fails every open with [`Error::Auth`].
    pub credentials: Option<Credentials>,

    /// Grid hub endpoint new sessions are bound to.
    pub hub_url: Url,

    /// Dashboard base URL for composed session log links.
    pub dashboard_url: Url,

    /// Process-wide tunnel/proxy connection, shared by all sessions.
    pub tunnel: Arc<dyn GridTunnel>,

    /// Browser name → capability payload resolution.
    pub resolver: Arc<dyn CapabilityResolver>,

    /// Creates one remote client per session.
    pub factory: Arc<dyn RemoteSessionFactory>,

    /// Job-status endpoint for finished sessions.
    pub reporter: Arc<dyn JobStatusReporter>,

    /// Screenshot persistence.
    pub file_saver: Arc<dyn FileSaver>,

    /// Supported browser names, fetched once at [`Provider::init`].
    pub browser_list: Arc<dyn BrowserListProvider>,

    /// Active sessions by browser id.
    pub registry: SessionRegistry,

    /// Per-session keep-alive timers.
    pub keep_alive: KeepAliveScheduler,

    /// Cached browser names.
    pub browser_names: Mutex<Vec<String>>,
}

// ============================================================================
// Provider
// ============================================================================

/// Runner-facing adapter for browsers hosted on a remote cloud grid.
///
/// The provider is responsible for:
/// - Creating, tracking, pinging, and tearing down one remote session per
///   logical browser id
/// - Resolving the capability payload sent at session start
/// - Propagating failures correctly through open/close
///
/// Cheap to clone; all clones share the same registry and collaborators.
#[derive(Clone)]
pub struct Provider {
    /// Shared inner state.
    pub(crate) inner: Arc<ProviderInner>,
}

// ============================================================================
// Provider - Display
// ============================================================================

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("hub_url", &self.inner.hub_url.as_str())
            .field("session_count", &self.inner.registry.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Provider - Initialization
// ============================================================================

impl Provider {
    /// Creates a configuration builder for the provider.
    #[inline]
    #[must_use]
    pub fn builder() -> super::ProviderBuilder {
        super::ProviderBuilder::new()
    }

    /// Fetches and caches the supported browser list.
    ///
    /// Called once per process lifetime, before any open.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser-list fetch fails.
    pub async fn init(&self) -> Result<()> {
        let names = self.inner.browser_list.list().await?;
        info!(count = names.len(), "Browser list fetched");
        *self.inner.browser_names.lock() = names;
        Ok(())
    }

    /// Returns the cached supported browser names.
    #[must_use]
    pub fn browser_list(&self) -> Vec<String> {
        self.inner.browser_names.lock().clone()
    }

    /// Returns `true`: any browser name is accepted here.
    ///
    /// Validation happens at capability-resolution time, where the grid has
    /// the authoritative answer.
    #[inline]
    #[must_use]
    pub fn is_valid_browser_name(&self, _browser_name: &str) -> bool {
        true
    }

    /// Returns `true`: the provider drives many concurrent sessions.
    #[inline]
    #[must_use]
    pub fn is_multi_browser(&self) -> bool {
        true
    }

    /// Tears down the process-wide grid connection.
    ///
    /// Errors are logged and swallowed: a failing teardown must not block
    /// the runner. Safe to call repeatedly.
    pub async fn dispose(&self) {
        debug!("Dispose initiated");
        if let Err(e) = self.inner.tunnel.destroy().await {
            warn!(error = %e, "Error destroying grid connection");
        }
        debug!("Dispose completed");
    }
}

// ============================================================================
// Provider - Open
// ============================================================================

impl Provider {
    /// Opens a remote browser session for a logical browser id.
    ///
    /// Resolves capabilities for `browser_name`, starts a remote session,
    /// navigates it to `page_url`, and begins keep-alive pinging. On
    /// success the session's dashboard log URL is recorded as user-agent
    /// metadata (best-effort).
    ///
    /// # Errors
    ///
    /// - [`Error::Auth`] if credentials are absent (no side effects)
    /// - [`Error::Connection`] if the process-wide tunnel handshake fails
    /// - The resolver's error, verbatim, if capability resolution fails;
    ///   the process-wide connection is torn down first
    /// - The remote error, verbatim, if `init` or `get` fails; the session
    ///   is removed and the process-wide connection torn down first
    pub async fn open_browser(
        &self,
        id: impl Into<BrowserId>,
        page_url: &str,
        browser_name: &str,
    ) -> Result<()> {
        let id = id.into();
        info!(id = %id, browser = browser_name, "Open browser requested");

        // Credentials are checked before any other interface is touched.
        let Some(credentials) = self.inner.credentials.clone() else {
            return Err(Error::Auth);
        };

        // Process-wide prerequisite, idempotent across sessions.
        self.inner.tunnel.connect().await?;

        let capabilities = match self.inner.resolver.resolve(&id, browser_name).await {
            Ok(caps) => caps,
            Err(err) => {
                warn!(id = %id, error = %err, "Capability resolution failed");
                self.dispose().await;
                return Err(err);
            }
        };
        debug!(id = %id, capabilities = %capabilities.as_json(), "Capabilities resolved");

        let remote = self
            .inner
            .factory
            .create(&self.inner.hub_url, &credentials);
        let session = Session::new(id.clone(), remote, capabilities);

        // Registered in Starting state before init is issued; a concurrent
        // open for the same id overwrites this entry (last writer wins).
        self.inner.registry.put(session.clone());

        if let Err(err) = self.start_session(&session, page_url).await {
            warn!(id = %id, error = %err, "Error while starting browser");
            self.inner.keep_alive.stop(&session);
            session.set_state(SessionState::Failed);
            self.inner.registry.remove(&id);
            self.dispose().await;
            return Err(err);
        }

        self.record_session_url(&session);
        info!(id = %id, "Browser opened");
        Ok(())
    }

    /// Runs the remote handshake and initial navigation.
    ///
    /// `get` is never issued before `init` resolves, and the keep-alive
    /// timer is never started before `init` resolves.
    async fn start_session(&self, session: &Session, page_url: &str) -> Result<()> {
        let remote = session.remote();

        let remote_session_id = remote.init(session.capabilities()).await?;
        session.mark_active(remote_session_id);
        self.inner.keep_alive.start(session);

        remote.get(page_url).await?;
        Ok(())
    }

    /// Composes the dashboard log URL and records it on the session.
    ///
    /// Best-effort: a session without a recorded URL is still usable.
    fn record_session_url(&self, session: &Session) {
        let Some(remote_session_id) = session.remote_session_id() else {
            return;
        };

        let session_url = format!(
            "{}/logs/?sessionID={}",
            self.inner.dashboard_url.as_str().trim_end_matches('/'),
            remote_session_id
        );
        info!(id = %session.id(), url = %session_url, "Session dashboard link");
        session.set_user_agent_meta(session_url);
    }

    /// Returns the recorded dashboard log URL for a browser id, if any.
    #[must_use]
    pub fn session_url(&self, id: impl Into<BrowserId>) -> Option<String> {
        self.inner.registry.get(&id.into())?.user_agent_meta()
    }
}

// ============================================================================
// Provider - Close
// ============================================================================

impl Provider {
    /// Closes the remote session for a browser id.
    ///
    /// Never fails from the caller's perspective: an unknown id is a logged
    /// no-op, and remote quit errors are logged and swallowed. The
    /// keep-alive timer is cancelled unconditionally and the registry entry
    /// removed, so a second close is also a no-op.
    pub async fn close_browser(&self, id: impl Into<BrowserId>) {
        let id = id.into();
        debug!(id = %id, "Close browser requested");

        let Some(session) = self.inner.registry.get(&id) else {
            debug!(id = %id, "Browser not found in open state");
            return;
        };

        session.set_state(SessionState::Closing);
        self.inner.keep_alive.stop(&session);

        match session.remote_session_id() {
            Some(remote_session_id) => {
                debug!(id = %id, remote_session_id = %remote_session_id, "Quitting remote session");
                if let Err(e) = session.remote().quit().await {
                    warn!(id = %id, error = %e, "Remote quit failed");
                }
            }
            None => {
                debug!(id = %id, "Remote session id never assigned; skipping quit");
            }
        }

        session.set_state(SessionState::Closed);
        self.inner.registry.remove(&id);
        info!(id = %id, "Browser closed");
    }
}

// ============================================================================
// Provider - Window Operations
// ============================================================================

impl Provider {
    /// Captures a screenshot and persists it at `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::SessionNotFound`] if no session is registered for `id`
    /// - The remote error, verbatim, if the capture fails (no retries)
    /// - The file saver's error if persistence fails
    pub async fn take_screenshot(
        &self,
        id: impl Into<BrowserId>,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let session = self.session(&id.into())?;
        let base64_data = session.remote().take_screenshot().await?;
        self.inner.file_saver.save(path.as_ref(), &base64_data).await
    }

    /// Resizes the session's window to `width` x `height`.
    ///
    /// No bounds validation is performed here; the grid is authoritative.
    ///
    /// # Errors
    ///
    /// - [`Error::SessionNotFound`] if no session is registered for `id`
    /// - The remote error, verbatim, if the window call fails
    pub async fn resize_window(
        &self,
        id: impl Into<BrowserId>,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let session = self.session(&id.into())?;
        let remote = session.remote();

        let handle = remote.window_handle().await?;
        remote.window_size(&handle, width, height).await
    }

    /// Maximizes the session's window.
    ///
    /// # Errors
    ///
    /// - [`Error::SessionNotFound`] if no session is registered for `id`
    /// - The remote error, verbatim, if the window call fails
    pub async fn maximize_window(&self, id: impl Into<BrowserId>) -> Result<()> {
        let session = self.session(&id.into())?;
        let remote = session.remote();

        let handle = remote.window_handle().await?;
        remote.maximize(&handle).await
    }

    /// Looks up the session for an id, failing loudly when absent.
    fn session(&self, id: &BrowserId) -> Result<Session> {
        self.inner
            .registry
            .get(id)
            .ok_or_else(|| Error::session_not_found(id.clone()))
    }
}

// ============================================================================
// Provider - Job Reporting
// ============================================================================

impl Provider {
    /// Reports the job outcome for a finished session.
    ///
    /// Returns `Ok(None)` without contacting the reporter if the id is
    /// unknown or the session never obtained a remote session identifier.
    /// Session state is never mutated by this call.
    ///
    /// # Errors
    ///
    /// Returns the reporter's error if the status update fails.
    pub async fn report_job_result(
        &self,
        id: impl Into<BrowserId>,
        job_result: &str,
        job_data: &Value,
        kind: JobResultKind,
    ) -> Result<Option<Value>> {
        let id = id.into();

        let Some(session) = self.inner.registry.get(&id) else {
            debug!(id = %id, "No session for job report");
            return Ok(None);
        };
        let Some(remote_session_id) = session.remote_session_id() else {
            debug!(id = %id, "No remote session id for job report");
            return Ok(None);
        };

        let response = self
            .inner
            .reporter
            .update(&remote_session_id, job_result, job_data, kind)
            .await?;
        Ok(Some(response))
    }
}

// ============================================================================
// Provider - Accessors
// ============================================================================

impl Provider {
    /// Returns the number of registered sessions.
    #[inline]
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Returns the grid hub endpoint.
    #[inline]
    #[must_use]
    pub fn hub_url(&self) -> &Url {
        &self.inner.hub_url
    }

    /// Returns the registered session for a browser id, if any.
    #[must_use]
    pub fn session_for(&self, id: impl Into<BrowserId>) -> Option<Session> {
        self.inner.registry.get(&id.into())
    }
}

// ============================================================================
// Tests
// ============================================================================
