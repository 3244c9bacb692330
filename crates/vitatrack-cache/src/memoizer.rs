//! Recommendation memoization.
//!
//! Caches computed nutrition recommendations keyed by a bucketed profile
//! fingerprint rather than by identity: recommendations depend on (BMI
//! bucket, condition set), so distinct users with similar profiles share
//! one entry, and the second caller gets the first caller's result.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::{self, DynCacheBackend};
use crate::keys;

/// A memoized recommendation with hit bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoizedResult {
    /// The bucketed key the entry is stored under.
    pub key: String,

    /// The computed recommendation, opaque to the cache layer.
    pub value: Value,

    /// Timestamp when the entry was (re)written.
    #[serde(with = "time::serde::rfc3339")]
    pub cached_at: OffsetDateTime,

    /// How many writes found the key already populated. Read-then-
    /// increment, not atomic: concurrent writers can lose increments.
    /// Statistics only; the value field is last-writer-wins-safe because
    /// all writers for one key computed the same semantic result.
    pub hit_count: u64,
}

/// Profile-bucketed recommendation cache over the shared backend.
pub struct ResultMemoizer {
    backend: DynCacheBackend,
}

impl ResultMemoizer {
    /// Creates a memoizer over the given backend handle.
    #[must_use]
    pub fn new(backend: DynCacheBackend) -> Self {
        Self { backend }
    }

    /// Stores a computed recommendation under the bucketed profile key,
    /// carrying the hit counter forward from any existing entry.
    pub async fn put(&self, bmi: f64, conditions: &[String], value: Value, ttl: Duration) {
        let key = keys::recommendation(bmi, conditions);
        let hit_count = match backend::decode::<MemoizedResult>(&key, self.backend.get(&key).await)
        {
            Some(existing) => existing.hit_count + 1,
            None => 0,
        };
        let entry = MemoizedResult {
            key: key.clone(),
            value,
            cached_at: OffsetDateTime::now_utc(),
            hit_count,
        };
        if let Some(raw) = backend::encode(&entry) {
            self.backend.set(&key, &raw, Some(ttl)).await;
        }
    }

    /// Returns the memoized recommendation for this profile, or `None`;
    /// callers treat `None` as a miss and fall back to full computation.
    pub async fn get(&self, bmi: f64, conditions: &[String]) -> Option<Value> {
        self.get_entry(bmi, conditions).await.map(|entry| entry.value)
    }

    /// Returns the full memoized entry, including bookkeeping fields.
    pub async fn get_entry(&self, bmi: f64, conditions: &[String]) -> Option<MemoizedResult> {
        let key = keys::recommendation(bmi, conditions);
        let entry: MemoizedResult = backend::decode(&key, self.backend.get(&key).await)?;
        debug!(key, hit_count = entry.hit_count, "memoized recommendation hit");
        Some(entry)
    }
}
