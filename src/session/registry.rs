//! The id → session table.
//!
//! All session-table mutation funnels through [`SessionRegistry`]; no other
//! code touches the map. This keeps the per-id race documented in the crate
//! docs an explicit property of three operations rather than an accident of
//! scattered access.

// ============================================================================
// Imports
// ============================================================================

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::identifiers::BrowserId;

use super::Session;

// ============================================================================
// SessionRegistry
// ============================================================================

/// Mapping from logical browser id to [`Session`].
///
/// Insert uses plain overwrite semantics: two concurrent opens for the same
/// id race, and the last writer wins. The registry does not serialize per-id
/// operations; callers wanting stronger guarantees must queue opens per id
/// themselves.
#[derive(Default)]
pub struct SessionRegistry {
    /// Active sessions by browser id.
    sessions: Mutex<FxHashMap<BrowserId, Session>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the session for its id.
    ///
    /// Returns the previous session for the id, if any, so a caller can log
    /// an overwrite-in-flight.
    pub fn put(&self, session: Session) -> Option<Session> {
        let id = session.id().clone();
        let prior = self.sessions.lock().insert(id.clone(), session);
        if prior.is_some() {
            debug!(id = %id, "Registry entry overwritten");
        }
        prior
    }

    /// Returns the session for `id`, if registered.
    #[must_use]
    pub fn get(&self, id: &BrowserId) -> Option<Session> {
        self.sessions.lock().get(id).cloned()
    }

    /// Removes and returns the session for `id`, if registered.
    pub fn remove(&self, id: &BrowserId) -> Option<Session> {
        let removed = self.sessions.lock().remove(id);
        if removed.is_some() {
            debug!(id = %id, "Registry entry removed");
        }
        removed
    }

    /// Returns `true` if a session is registered for `id`.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &BrowserId) -> bool {
        self.sessions.lock().contains_key(id)
    }

    /// Returns the number of registered sessions.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Returns `true` if no sessions are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use crate::error::Result;
    use crate::identifiers::RemoteSessionId;
    use crate::remote::{Capabilities, RemoteSessionClient};

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

    fn session(id: &str) -> Session {
        Session::new(
            BrowserId::new(id),
            Arc::new(NullClient),
            Capabilities::new(json!({})),
        )
    }

    #[test]
    fn test_put_and_get() {
        let registry = SessionRegistry::new();
        assert!(registry.is_empty());

        registry.put(session("b1"));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&BrowserId::new("b1")));

        let found = registry.get(&BrowserId::new("b1")).unwrap();
        assert_eq!(found.id().as_str(), "b1");
    }

    #[test]
    fn test_get_unknown_returns_none() {
        let registry = SessionRegistry::new();
        assert!(registry.get(&BrowserId::new("missing")).is_none());
    }

    #[test]
    fn test_put_overwrites_and_returns_prior() {
        let registry = SessionRegistry::new();
        assert!(registry.put(session("b1")).is_none());

        let prior = registry.put(session("b1"));
        assert!(prior.is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove() {
        let registry = SessionRegistry::new();
        registry.put(session("b1"));

        assert!(registry.remove(&BrowserId::new("b1")).is_some());
        assert!(registry.remove(&BrowserId::new("b1")).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_distinct_ids_do_not_collide() {
        let registry = SessionRegistry::new();
        registry.put(session("b1"));
        registry.put(session("b2"));

        assert_eq!(registry.len(), 2);
        registry.remove(&BrowserId::new("b1"));
        assert!(registry.contains(&BrowserId::new("b2")));
    }
}
