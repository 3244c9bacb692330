//! Post-mutation cache invalidation.
//!
//! After a mutating operation succeeds against the document store, the
//! entries computed from the old state must go. Each domain maps to the
//! exact keys the deployed system is known to write plus a key prefix
//! that is scanned and deleted, so request-cache shapes added later are
//! still covered without updating a hard-coded list.
//!
//! Invalidation is best-effort by contract: a failed delete is logged by
//! the backend and skipped; it never aborts the remaining deletes and
//! never fails the enclosing request. A missed delete costs one TTL of
//! staleness, nothing more.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::DynCacheBackend;
use crate::keys;

/// Cache domains a mutating operation can invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationDomain {
    /// Health record mutations: the snapshot cache and health request
    /// caches.
    Health,
    /// Meal log mutations: the daily/weekly meal request caches.
    Meals,
}

impl InvalidationDomain {
    /// Returns the domain tag as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Meals => "meals",
        }
    }

    /// Keys the deployed system is known to write for this domain.
    fn exact_keys(&self, identity: &str) -> Vec<String> {
        match self {
            Self::Health => vec![keys::profile(identity)],
            Self::Meals => vec![
                keys::request(identity, "/api/meals/daily"),
                keys::request(identity, "/api/meals/weekly"),
            ],
        }
    }

    /// Request-cache prefix covering this domain's entries, including
    /// shapes added after this list was written.
    fn scan_prefix(&self, identity: &str) -> String {
        match self {
            Self::Health => format!("{}/api/health", keys::request_prefix(identity)),
            Self::Meals => format!("{}/api/meals", keys::request_prefix(identity)),
        }
    }
}

impl std::fmt::Display for InvalidationDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Removes stale entries for one identity after a mutation.
pub struct CacheInvalidator {
    backend: DynCacheBackend,
}

impl CacheInvalidator {
    /// Creates an invalidator over the given backend handle.
    #[must_use]
    pub fn new(backend: DynCacheBackend) -> Self {
        Self { backend }
    }

    /// Deletes every cached entry of `identity` in the given domains.
    ///
    /// Call only after the authoritative write has succeeded; invalidation
    /// never runs speculatively. Returns the number of keys removed.
    pub async fn invalidate(&self, identity: &str, domains: &[InvalidationDomain]) -> u64 {
        let mut removed = 0u64;
        for domain in domains {
            for key in domain.exact_keys(identity) {
                if self.backend.del(&key).await {
                    removed += 1;
                }
            }
            for key in self.backend.scan(&domain.scan_prefix(identity)).await {
                if self.backend.del(&key).await {
                    removed += 1;
                }
            }
        }
        debug!(identity, ?domains, removed, "cache invalidation complete");
        removed
    }
}
