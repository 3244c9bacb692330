//! Session token cache.
//!
//! Maps a user identity to its currently valid auth token. Semantics are
//! single-session-per-user: a new login overwrites the previous entry,
//! and logout deletes it explicitly. Everything else expires via TTL.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::{self, DynCacheBackend};
use crate::keys;

/// A cached session: one active token per identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEntry {
    /// The authenticated identity.
    pub identity: String,

    /// The currently valid auth token.
    pub token: String,

    /// Timestamp when the session expires.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl SessionEntry {
    /// Returns `true` if the session has outlived its expiry.
    ///
    /// The backend TTL normally removes entries first; this covers a
    /// backend whose TTL enforcement lags.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }
}

/// Session token store over the shared cache backend.
pub struct SessionStore {
    backend: DynCacheBackend,
}

impl SessionStore {
    /// Creates a store over the given backend handle.
    #[must_use]
    pub fn new(backend: DynCacheBackend) -> Self {
        Self { backend }
    }

    /// Stores a token for `identity`, overwriting any previous session.
    pub async fn put(&self, identity: &str, token: &str, ttl: Duration) {
        let entry = SessionEntry {
            identity: identity.to_string(),
            token: token.to_string(),
            expires_at: OffsetDateTime::now_utc() + ttl,
        };
        if let Some(raw) = backend::encode(&entry) {
            self.backend
                .set(&keys::session(identity), &raw, Some(ttl))
                .await;
        }
    }

    /// Returns the active token for `identity`, if any.
    pub async fn get(&self, identity: &str) -> Option<String> {
        let key = keys::session(identity);
        let entry: SessionEntry = backend::decode(&key, self.backend.get(&key).await)?;
        if entry.is_expired() {
            debug!(identity, "session entry outlived its expiry, dropping");
            self.backend.del(&key).await;
            return None;
        }
        Some(entry.token)
    }

    /// Removes the session for `identity` (logout).
    ///
    /// Returns `true` when a session was actually deleted.
    pub async fn remove(&self, identity: &str) -> bool {
        self.backend.del(&keys::session(identity)).await
    }
}
