//! Read-through request caching.
//!
//! An explicit continuation wrapper: the handler's result is produced
//! first, then written back to the cache as a distinct step. This
//! replaces the deployed system's trick of patching the response object
//! to intercept its own send; plain function composition does the same
//! job without mutating anything shared.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::backend::{self, DynCacheBackend};
use crate::keys;

/// Generic per-identity, per-path response cache.
pub struct RequestCache {
    backend: DynCacheBackend,
}

impl RequestCache {
    /// Creates a request cache over the given backend handle.
    #[must_use]
    pub fn new(backend: DynCacheBackend) -> Self {
        Self { backend }
    }

    /// Returns the cached value for `(identity, path)` or runs `compute`
    /// and caches its success value for `ttl`.
    ///
    /// `compute` errors pass through untouched and nothing is cached for
    /// them. Cache faults never surface: a down backend just means
    /// `compute` runs every time.
    pub async fn wrap<T, E, F, Fut>(
        &self,
        identity: &str,
        path: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = keys::request(identity, path);
        if let Some(hit) = backend::decode::<T>(&key, self.backend.get(&key).await) {
            debug!(key, "request cache hit");
            return Ok(hit);
        }

        let value = compute().await?;
        if let Some(raw) = backend::encode(&value) {
            self.backend.set(&key, &raw, Some(ttl)).await;
        }
        Ok(value)
    }
}
