//! In-memory cache backend.
//!
//! A process-local stand-in for the remote backend, used by tests and by
//! development setups without a Redis instance. Entries expire lazily on
//! read. Two test hooks make the TTL and fail-open contracts observable:
//! [`MemoryBackend::advance`] skews the backend clock forward, and
//! [`MemoryBackend::set_connected`] flips the connection flag.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;
use time::OffsetDateTime;

use crate::backend::CacheBackend;

#[derive(Clone)]
struct Entry {
    value: String,
    expires_at: Option<OffsetDateTime>,
}

/// Process-local cache backend.
pub struct MemoryBackend {
    entries: DashMap<String, Entry>,
    connected: AtomicBool,
    clock_skew_secs: AtomicI64,
}

impl MemoryBackend {
    /// Creates an empty, connected backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            connected: AtomicBool::new(true),
            clock_skew_secs: AtomicI64::new(0),
        }
    }

    /// Moves this backend's clock forward, expiring entries whose TTL has
    /// elapsed. Test hook; wall time is unaffected.
    pub fn advance(&self, delta: Duration) {
        self.clock_skew_secs
            .fetch_add(delta.as_secs() as i64, Ordering::SeqCst);
    }

    /// Flips the connection flag. Test hook for fail-open behavior.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Number of live and expired entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
            + time::Duration::seconds(self.clock_skew_secs.load(Ordering::SeqCst))
    }

    /// Reads a key, removing it if its TTL has elapsed.
    fn live(&self, key: &str) -> Option<String> {
        let now = self.now();
        let hit = match self.entries.get(key) {
            None => return None,
            Some(entry) => {
                if entry.expires_at.is_some_and(|at| at <= now) {
                    None
                } else {
                    Some(entry.value.clone())
                }
            }
        };
        if hit.is_none() {
            self.entries.remove(key);
        }
        hit
    }

    fn insert(&self, key: &str, value: &str, ttl: Option<Duration>) {
        let expires_at = ttl.map(|ttl| self.now() + ttl);
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Option<String> {
        if !self.is_connected() {
            return None;
        }
        self.live(key)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> bool {
        if !self.is_connected() {
            return false;
        }
        self.insert(key, value, ttl);
        true
    }

    async fn del(&self, key: &str) -> bool {
        if !self.is_connected() {
            return false;
        }
        self.entries.remove(key).is_some()
    }

    async fn exists(&self, key: &str) -> bool {
        if !self.is_connected() {
            return false;
        }
        self.live(key).is_some()
    }

    async fn mget(&self, keys: &[String]) -> Vec<Option<String>> {
        if !self.is_connected() {
            return vec![None; keys.len()];
        }
        keys.iter().map(|key| self.live(key)).collect()
    }

    async fn mset(&self, pairs: &[(String, String)], ttl: Option<Duration>) -> bool {
        if !self.is_connected() {
            return false;
        }
        for (key, value) in pairs {
            self.insert(key, value, ttl);
        }
        true
    }

    async fn scan(&self, prefix: &str) -> Vec<String> {
        if !self.is_connected() {
            return Vec::new();
        }
        let now = self.now();
        self.entries
            .iter()
            .filter(|entry| {
                entry.key().starts_with(prefix)
                    && !entry.value().expires_at.is_some_and(|at| at <= now)
            })
            .map(|entry| entry.key().clone())
            .collect()
    }

    async fn ping(&self) -> bool {
        self.is_connected()
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
