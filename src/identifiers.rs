//! Type-safe identifiers for grid sessions.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time:
//!
//! | Type | Origin | Used for |
//! |------|--------|----------|
//! | [`BrowserId`] | Runner-supplied | Registry key for one logical browser |
//! | [`RemoteSessionId`] | Grid-assigned | Keep-alive, dashboard links, job reports |
//!
//! A [`BrowserId`] exists before any network traffic; a [`RemoteSessionId`]
//! exists only after the remote handshake has been accepted.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// BrowserId
// ============================================================================

/// Logical browser identifier supplied by the runner.
///
/// Caller-controlled and unique per open browser; never generated by this
/// crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrowserId(String);

impl BrowserId {
    /// Creates a browser id from any string-like value.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BrowserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BrowserId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for BrowserId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// RemoteSessionId
// ============================================================================

/// Opaque session identifier assigned by the remote grid.
///
/// Produced once the session handshake succeeds; correlates keep-alive
/// pings, dashboard log URLs, and job-status reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteSessionId(String);

impl RemoteSessionId {
    /// Creates a remote session id from any string-like value.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the grid assigned an empty identifier.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RemoteSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RemoteSessionId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for RemoteSessionId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_id_display() {
        let id = BrowserId::new("b1");
        assert_eq!(id.to_string(), "b1");
        assert_eq!(id.as_str(), "b1");
    }

    #[test]
    fn test_browser_id_from_str() {
        let id: BrowserId = "tab-3".into();
        assert_eq!(id, BrowserId::new("tab-3"));
    }

    #[test]
    fn test_remote_session_id_display() {
        let id = RemoteSessionId::new("abc123");
        assert_eq!(id.to_string(), "abc123");
        assert!(!id.is_empty());
    }

    #[test]
    fn test_remote_session_id_empty() {
        assert!(RemoteSessionId::new("").is_empty());
    }

    #[test]
    fn test_ids_serialize_transparent() {
        let id = BrowserId::new("b1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"b1\"");

        let sid: RemoteSessionId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(sid, RemoteSessionId::new("abc123"));
    }
}
