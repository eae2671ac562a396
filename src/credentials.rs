//! Grid account credentials.
//!
//! The grid authenticates every session with a username and access key,
//! sourced from the `GRID_USERNAME` and `GRID_ACCESS_KEY` environment
//! variables. Their presence is a precondition for every open: the provider
//! checks credentials before touching any other interface, so a missing key
//! fails fast with zero network side effects.

// ============================================================================
// Imports
// ============================================================================

use std::env;
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Environment variable holding the grid account username.
pub const USERNAME_ENV: &str = "GRID_USERNAME";

/// Environment variable holding the grid access key.
pub const ACCESS_KEY_ENV: &str = "GRID_ACCESS_KEY";

// ============================================================================
// Credentials
// ============================================================================

/// Grid account credentials (username + access key).
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Grid account username.
    pub username: String,
    /// Grid access key.
    pub access_key: String,
}

impl Credentials {
    /// Creates credentials from explicit values.
    ///
    /// Returns `None` if either value is empty, matching the env-sourced
    /// precondition check.
    #[must_use]
    pub fn new(username: impl Into<String>, access_key: impl Into<String>) -> Option<Self> {
        let username = username.into();
        let access_key = access_key.into();

        if username.is_empty() || access_key.is_empty() {
            return None;
        }

        Some(Self {
            username,
            access_key,
        })
    }

    /// Loads credentials from the process environment.
    ///
    /// Returns `None` if either `GRID_USERNAME` or `GRID_ACCESS_KEY` is
    /// unset or empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let username = env::var(USERNAME_ENV).ok()?;
        let access_key = env::var(ACCESS_KEY_ENV).ok()?;
        Self::new(username, access_key)
    }
}

// Access key must never appear in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
