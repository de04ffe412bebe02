//! Session persistence across two surfaces: a client-local key-value file
//! and a cookie jar readable by edge/middleware logic.
//!
//! Errors at this boundary are contained, not propagated: a storage or
//! serialization failure is logged and reported as "absent". Malformed
//! persisted data is treated as corruption and wipes both surfaces.
//!
//! The composite write/clear operations cover both surfaces but are not
//! transactional; a crash between the two writes leaves them briefly
//! inconsistent. That window is accepted: the next restore reads the local
//! store as source of truth and the surfaces reconverge.

mod cookies;
mod local;

pub use cookies::{CookieJar, CookieOptions, SameSite};
pub use local::LocalStore;

use std::path::Path;

use chrono::Duration;

use crate::models::Identity;

/// Local-store key holding the JSON-serialized identity.
pub const USER_KEY: &str = "auth_user";
/// Key holding the raw bearer token, in the local store and as a cookie.
pub const TOKEN_KEY: &str = "auth_token";

#[derive(Debug, Clone)]
pub struct SessionStore {
    local: LocalStore,
    cookies: CookieJar,
    cookie_options: CookieOptions,
}

impl SessionStore {
    /// Both surfaces live under one state directory: `state.json` for the
    /// local store, `cookies.json` for the jar.
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        let state_dir = state_dir.as_ref();
        Self {
            local: LocalStore::new(state_dir.join("state.json")),
            cookies: CookieJar::new(state_dir.join("cookies.json")),
            cookie_options: CookieOptions::auth_default(),
        }
    }

    pub fn with_cookie_max_age(mut self, max_age: Duration) -> Self {
        self.cookie_options = self.cookie_options.with_max_age(max_age);
        self
    }

    // --- identity ---

    pub fn set_identity(&self, identity: &Identity) {
        let raw = match serde_json::to_string(identity) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize identity; not persisted");
                return;
            }
        };
        if let Err(err) = self.local.set(USER_KEY, &raw) {
            tracing::warn!(error = %err, "failed to persist identity");
        }
    }

    /// A stored identity that does not parse is treated as corruption: both
    /// surfaces are cleared and the identity is reported absent.
    pub fn get_identity(&self) -> Option<Identity> {
        let raw = match self.local.get(USER_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read identity; treating as absent");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(identity) => Some(identity),
            Err(err) => {
                tracing::warn!(error = %err, "stored identity is corrupt; clearing session state");
                self.clear_all();
                None
            }
        }
    }

    pub fn clear_identity(&self) {
        if let Err(err) = self.local.remove(USER_KEY) {
            tracing::warn!(error = %err, "failed to clear identity");
        }
    }

    // --- token ---

    pub fn set_token(&self, token: &str) {
        if let Err(err) = self.local.set(TOKEN_KEY, token) {
            tracing::warn!(error = %err, "failed to persist token");
        }
    }

    pub fn get_token(&self) -> Option<String> {
        match self.local.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read token; treating as absent");
                None
            }
        }
    }

    pub fn clear_token(&self) {
        if let Err(err) = self.local.remove(TOKEN_KEY) {
            tracing::warn!(error = %err, "failed to clear token");
        }
    }

    // --- cookie surface ---

    pub fn set_cookie(&self, name: &str, value: &str, options: &CookieOptions) {
        if let Err(err) = self.cookies.set(name, value, options) {
            tracing::warn!(cookie = name, error = %err, "failed to write cookie");
        }
    }

    pub fn get_cookie(&self, name: &str) -> Option<String> {
        match self.cookies.get(name) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                tracing::warn!(cookie = name, error = %err, "failed to read cookie; treating as absent");
                None
            }
        }
    }

    pub fn remove_cookie(&self, name: &str, options: &CookieOptions) {
        if let Err(err) = self.cookies.remove(name, options) {
            tracing::warn!(cookie = name, error = %err, "failed to expire cookie");
        }
    }

    // --- composite operations ---

    /// Write the token to both surfaces. Caller-atomic, not transactional:
    /// the local write lands before the cookie write.
    pub fn store_token(&self, token: &str) {
        self.set_token(token);
        self.set_cookie(TOKEN_KEY, token, &self.cookie_options);
    }

    /// Persist a full session: identity to the local store, token to both
    /// surfaces.
    pub fn persist_session(&self, identity: &Identity, token: &str) {
        self.set_identity(identity);
        self.store_token(token);
    }

    /// Clear every copy on both surfaces. Safe to call repeatedly and on an
    /// already-empty store.
    pub fn clear_all(&self) {
        self.clear_identity();
        self.clear_token();
        self.remove_cookie(TOKEN_KEY, &self.cookie_options);
    }

    /// True when neither surface holds a token and no identity is stored.
    pub fn is_empty(&self) -> bool {
        self.get_token().is_none()
            && self.get_cookie(TOKEN_KEY).is_none()
            && match self.local.get(USER_KEY) {
                Ok(raw) => raw.is_none(),
                Err(_) => true,
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        (dir, store)
    }

    fn identity() -> Identity {
        Identity::new(Uuid::new_v4(), "Ada Lovelace", "ada@example.com", Role::User)
    }

    #[test]
    fn identity_round_trip() {
        let (_dir, store) = store();
        let ada = identity();

        store.set_identity(&ada);
        assert_eq!(store.get_identity(), Some(ada));
    }

    #[test]
    fn token_round_trip_hits_both_surfaces() {
        let (_dir, store) = store();
        store.store_token("abc");

        assert_eq!(store.get_token(), Some("abc".to_string()));
        assert_eq!(store.get_cookie(TOKEN_KEY), Some("abc".to_string()));
    }

    #[test]
    fn corrupt_identity_clears_both_surfaces() {
        let (dir, store) = store();
        store.persist_session(&identity(), "abc");

        // Overwrite the stored identity with garbage.
        let local = LocalStore::new(dir.path().join("state.json"));
        local.set(USER_KEY, "not-json").unwrap();

        assert_eq!(store.get_identity(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn clear_all_is_idempotent() {
        let (_dir, store) = store();
        store.persist_session(&identity(), "abc");

        store.clear_all();
        assert!(store.is_empty());

        // Second clear on an empty store must not fail.
        store.clear_all();
        assert!(store.is_empty());
    }

    #[test]
    fn empty_token_reads_as_absent() {
        let (_dir, store) = store();
        store.set_token("");
        assert_eq!(store.get_token(), None);
    }
}
