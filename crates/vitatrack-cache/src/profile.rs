//! Health snapshot cache.
//!
//! Caches a user's computed health snapshot (metrics plus derived fields)
//! keyed by identity. The snapshot is an opaque JSON value to this layer;
//! the computation that produces it lives with the document store.
//! Entries are invalidated by [`crate::CacheInvalidator`] whenever the
//! underlying health record is mutated, and otherwise expire via TTL.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::{self, DynCacheBackend};
use crate::keys;

/// A cached health snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedProfile {
    /// The identity the snapshot belongs to.
    pub identity: String,

    /// The computed snapshot, opaque to the cache layer.
    pub payload: Value,

    /// Timestamp when the snapshot was cached.
    #[serde(with = "time::serde::rfc3339")]
    pub cached_at: OffsetDateTime,

    /// Timestamp when the entry expires.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// Health snapshot cache over the shared backend.
pub struct ProfileCache {
    backend: DynCacheBackend,
}

impl ProfileCache {
    /// Creates a cache over the given backend handle.
    #[must_use]
    pub fn new(backend: DynCacheBackend) -> Self {
        Self { backend }
    }

    /// Caches a freshly computed snapshot for `identity`.
    pub async fn put(&self, identity: &str, payload: Value, ttl: Duration) {
        let now = OffsetDateTime::now_utc();
        let entry = CachedProfile {
            identity: identity.to_string(),
            payload,
            cached_at: now,
            expires_at: now + ttl,
        };
        if let Some(raw) = backend::encode(&entry) {
            self.backend
                .set(&keys::profile(identity), &raw, Some(ttl))
                .await;
        }
    }

    /// Returns the cached snapshot for `identity`, or `None` on miss.
    pub async fn get(&self, identity: &str) -> Option<Value> {
        let key = keys::profile(identity);
        let entry: CachedProfile = backend::decode(&key, self.backend.get(&key).await)?;
        debug!(identity, "health snapshot cache hit");
        Some(entry.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use serde_json::json;
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(1_800);

    fn cache() -> (Arc<MemoryBackend>, ProfileCache) {
        let backend = Arc::new(MemoryBackend::new());
        let cache = ProfileCache::new(backend.clone());
        (backend, cache)
    }

    fn snapshot() -> Value {
        json!({
            "bmi": 23.4,
            "weightKg": 71.2,
            "conditions": ["hypertension"],
            "dailyCalorieTarget": 2100
        })
    }

    #[tokio::test]
    async fn test_miss_then_hit_then_expiry() {
        let (backend, cache) = cache();

        assert_eq!(cache.get("alice").await, None);

        cache.put("alice", snapshot(), TTL).await;
        assert_eq!(cache.get("alice").await, Some(snapshot()));

        backend.advance(TTL + Duration::from_secs(1));
        assert_eq!(cache.get("alice").await, None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let (_backend, cache) = cache();
        cache.put("alice", json!({"v": 1}), TTL).await;
        cache.put("alice", json!({"v": 2}), TTL).await;
        assert_eq!(cache.get("alice").await, Some(json!({"v": 2})));
    }

    #[tokio::test]
    async fn test_identities_do_not_share_snapshots() {
        let (_backend, cache) = cache();
        cache.put("alice", json!({"who": "alice"}), TTL).await;
        assert_eq!(cache.get("bob").await, None);
    }

    #[tokio::test]
    async fn test_degrades_to_miss_when_disconnected() {
        let (backend, cache) = cache();
        cache.put("alice", snapshot(), TTL).await;

        backend.set_connected(false);
        assert_eq!(cache.get("alice").await, None);
    }

    #[tokio::test]
    async fn test_corrupted_entry_reads_as_miss() {
        let (backend, cache) = cache();
        use crate::backend::CacheBackend;
        backend
            .set(&keys::profile("alice"), "{definitely not json", None)
            .await;
        assert_eq!(cache.get("alice").await, None);
    }
}
