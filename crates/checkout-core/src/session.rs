//! # Session & Credentials
//!
//! The authentication gate: a checkout attempt may only start side effects
//! once a valid credential exists for the session. A mid-flow authorization
//! failure clears the stored credential, so the next attempt forces
//! re-authentication. The original submission is never auto-resumed after
//! login; the user re-triggers submit with fresh form state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Credential and profile for an authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Opaque bearer token for collaborator calls
    pub token: String,
    /// User identifier
    pub user_id: String,
}

/// Session-scoped credential storage
pub trait SessionStore: Send + Sync {
    /// Look up the credential for a session, if any
    fn credential(&self, session: &str) -> Option<Credential>;

    /// Store a credential for a session
    fn store(&self, session: &str, credential: Credential);

    /// Drop a session's credential (expired or revoked)
    fn clear(&self, session: &str);
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Credential>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn credential(&self, session: &str) -> Option<Credential> {
        self.sessions
            .read()
            .expect("session store lock poisoned")
            .get(session)
            .cloned()
    }

    fn store(&self, session: &str, credential: Credential) {
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .insert(session.to_string(), credential);
    }

    fn clear(&self, session: &str) {
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .remove(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_clear() {
        let store = InMemorySessionStore::new();
        assert!(store.credential("s1").is_none());

        store.store(
            "s1",
            Credential {
                token: "tok".into(),
                user_id: "u1".into(),
            },
        );
        assert_eq!(store.credential("s1").unwrap().user_id, "u1");

        store.clear("s1");
        assert!(store.credential("s1").is_none());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = InMemorySessionStore::new();
        store.store(
            "s1",
            Credential {
                token: "tok".into(),
                user_id: "u1".into(),
            },
        );
        assert!(store.credential("s2").is_none());
    }
}
