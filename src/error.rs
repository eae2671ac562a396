//! Error types for the grid provider.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use grid_provider::{Result, Error};
//!
//! async fn example(provider: &Provider) -> Result<()> {
//!     provider.open_browser("b1", "https://example.com", "chrome").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Credentials | [`Error::Auth`] |
//! | Grid connection | [`Error::Connection`] |
//! | Session start | [`Error::Capability`], [`Error::Start`] |
//! | Session teardown | [`Error::Quit`] |
//! | Lookup | [`Error::SessionNotFound`] |
//! | Remote transport | [`Error::Remote`] |
//! | External | [`Error::Io`], [`Error::Json`] |
//!
//! # Propagation policy
//!
//! Start-time errors ([`Error::Auth`], [`Error::Connection`],
//! [`Error::Capability`], [`Error::Start`]) always propagate to the runner
//! after cleanup. Close-time and keep-alive-ping errors are logged and
//! discarded at the provider boundary; [`Error::Quit`] exists so collaborator
//! implementations can report quit failures, but it never crosses
//! `close_browser`.

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::BrowserId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when provider configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Credential Errors
    // ========================================================================
    /// Grid credentials are missing.
    ///
    /// Returned when the username or access key environment variables are
    /// unset. Checked before any other interface is touched, so this error
    /// guarantees zero side effects.
    #[error(
        "Grid credentials missing: set GRID_USERNAME and GRID_ACCESS_KEY \
         before opening a browser"
    )]
    Auth,

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Process-wide tunnel/proxy handshake with the grid failed.
    ///
    /// Fatal to the open call that triggered it. Already-active sessions are
    /// not affected directly, but subsequent opens may keep failing.
    #[error("Grid connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    // ========================================================================
    // Session Start Errors
    // ========================================================================
    /// Capability resolution for a browser name failed.
    ///
    /// Returned by [`CapabilityResolver`](crate::remote::CapabilityResolver)
    /// implementations; the provider tears down the process-wide connection
    /// before propagating it.
    #[error("Capability resolution failed: {message}")]
    Capability {
        /// The resolver's error message, propagated verbatim.
        message: String,
    },

    /// Remote `init`/`get` failed while starting a session.
    ///
    /// The session is marked failed and removed; the process-wide connection
    /// is torn down before this error is re-thrown.
    #[error("Session start failed: {message}")]
    Start {
        /// Description of the start failure.
        message: String,
    },

    // ========================================================================
    // Session Teardown Errors
    // ========================================================================
    /// Remote `quit` failed during close.
    ///
    /// Logged and swallowed by `close_browser`; never surfaced to the runner.
    #[error("Session quit failed: {message}")]
    Quit {
        /// Description of the quit failure.
        message: String,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// Operation referenced a browser id with no registry entry.
    ///
    /// Screenshot/resize/maximize fail loudly with this; close and
    /// report-job-result degrade to no-ops instead.
    #[error("No session registered for browser: {id}")]
    SessionNotFound {
        /// The unknown browser id.
        id: BrowserId,
    },

    // ========================================================================
    // Remote Transport Errors
    // ========================================================================
    /// Generic remote transport failure.
    ///
    /// Used by [`RemoteSessionClient`](crate::remote::RemoteSessionClient)
    /// implementations for wire-level failures that are not one of the more
    /// specific variants above.
    #[error("Remote call failed: {message}")]
    Remote {
        /// Description of the transport failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a capability resolution error.
    #[inline]
    pub fn capability(message: impl Into<String>) -> Self {
        Self::Capability {
            message: message.into(),
        }
    }

    /// Creates a session start error.
    #[inline]
    pub fn start(message: impl Into<String>) -> Self {
        Self::Start {
            message: message.into(),
        }
    }

    /// Creates a session quit error.
    #[inline]
    pub fn quit(message: impl Into<String>) -> Self {
        Self::Quit {
            message: message.into(),
        }
    }

    /// Creates a session-not-found error.
    #[inline]
    pub fn session_not_found(id: impl Into<BrowserId>) -> Self {
        Self::SessionNotFound { id: id.into() }
    }

    /// Creates a remote transport error.
    #[inline]
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a missing-credentials error.
    #[inline]
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth)
    }

    /// Returns `true` if this is a session-not-found error.
    #[inline]
    #[must_use]
    pub fn is_session_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound { .. })
    }

    /// Returns `true` if this error aborts an `open_browser` call.
    ///
    /// These are the variants the runner can observe from open; quit errors
    /// never escape close, so they are excluded.
    #[inline]
    #[must_use]
    pub fn is_fatal_to_open(&self) -> bool {
        matches!(
            self,
            Self::Auth | Self::Connection { .. } | Self::Capability { .. } | Self::Start { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
