//! Grid Provider - remote cloud-grid browser adapter for test runners.
//!
//! This library lets a test-automation runner drive browsers hosted on a
//! remote cloud grid through a WebDriver-compatible protocol. Runner
//! lifecycle calls (open a browser, resize it, screenshot it, close it,
//! report a job result) are translated into remote session operations while
//! per-session bookkeeping (remote session identifier, keep-alive timer,
//! capability set) stays consistent across concurrent sessions.
//!
//! # Architecture
//!
//! The stateful core is the session manager:
//!
//! - One [`Session`] per logical browser id, tracked in a single registry
//! - Handshake modeled as an awaited `init` future (Starting → Active)
//! - A per-session keep-alive timer pings the grid against idle timeout
//! - The process-wide tunnel connection is a shared singleton; teardown on
//!   any start-time failure affects all sessions
//!
//! Everything else (wire transport, capability computation, credential
//! loading, file persistence, job-status endpoint) is reached through the
//! narrow traits in [`remote`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use grid_provider::{Provider, Result};
//! # use grid_provider::remote::{GridTunnel, CapabilityResolver, RemoteSessionFactory,
//! #     JobStatusReporter, BrowserListProvider};
//! # async fn example(
//! #     tunnel: Arc<dyn GridTunnel>,
//! #     resolver: Arc<dyn CapabilityResolver>,
//! #     factory: Arc<dyn RemoteSessionFactory>,
//! #     reporter: Arc<dyn JobStatusReporter>,
//! #     browsers: Arc<dyn BrowserListProvider>,
//! # ) -> Result<()> {
//! let provider = Provider::builder()
//!     .credentials_from_env()
//!     .tunnel(tunnel)
//!     .resolver(resolver)
//!     .factory(factory)
//!     .reporter(reporter)
//!     .browser_list(browsers)
//!     .build()?;
//!
//! provider.init().await?;
//! provider.open_browser("b1", "https://example.com", "chrome").await?;
//! provider.take_screenshot("b1", "shots/example.png").await?;
//! provider.close_browser("b1").await;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`credentials`] | Env-sourced grid credentials |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`provider`] | Runner-facing [`Provider`] and builder |
//! | [`remote`] | External collaborator seams (traits) |
//! | [`session`] | Session state, registry, keep-alive |
//!
//! # Failure semantics
//!
//! Open either resolves (browser ready, dashboard log URL recorded) or
//! rejects with a descriptive error after cleanup; close always resolves,
//! with quit failures logged and swallowed. See [`error`] for the full
//! taxonomy and propagation policy.

// ============================================================================
// Modules
// ============================================================================

/// Env-sourced grid credentials.
///
/// Username and access key, checked before any network call.
pub mod credentials;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for grid sessions.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Runner-facing provider and configuration builder.
///
/// Use [`Provider::builder()`] to create a configured provider instance.
pub mod provider;

/// External collaborator seams.
///
/// Narrow traits for the wire transport, capability resolution, tunnel
/// lifecycle, screenshot persistence, and job reporting.
pub mod remote;

/// Session state, registry, and keep-alive scheduling.
///
/// The only part of the crate with real state and concurrency.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

// Credential types
pub use credentials::Credentials;

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{BrowserId, RemoteSessionId};

// Provider types
pub use provider::{Provider, ProviderBuilder};

// Collaborator seams
pub use remote::{
    BrowserListProvider, Capabilities, CapabilityResolver, DiskFileSaver, FileSaver, GridTunnel,
    JobResultKind, JobStatusReporter, RemoteSessionClient, RemoteSessionFactory,
};

// Session types
pub use session::{KeepAliveScheduler, Session, SessionRegistry, SessionState};
