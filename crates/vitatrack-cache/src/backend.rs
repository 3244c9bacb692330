//! Cache backend abstraction.
//!
//! This module defines the trait every cache backend implements, the
//! factory that selects one from configuration, and the JSON codec
//! helpers the typed components share.
//!
//! # Fail-open contract
//!
//! Backend operations are infallible at the signature level. An
//! implementation catches its own faults (unreachable backend, timeout,
//! protocol error), logs them, and returns the operation's empty value:
//! `None`, `false`, or an empty list. Callers treat that exactly like a
//! miss and fall through to the authoritative source.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::CacheConfig;

pub mod memory;
pub mod redis;

/// The cache backend trait.
///
/// Implementations must be thread-safe (`Send + Sync`) and are shared as
/// a single long-lived handle (see [`DynCacheBackend`]), constructed once
/// at process start and passed by reference to every component; there is
/// no implicit global client.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetches the raw value stored under `key`.
    ///
    /// Returns `None` for a missing key, a disconnected backend, or any
    /// backend fault.
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, expiring after `ttl` if given.
    ///
    /// Returns `true` if the write was accepted, `false` if it was
    /// dropped. A dropped write is not an error: the entry will simply be
    /// recomputed on the next read.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> bool;

    /// Removes `key`. Returns `true` when an entry was actually deleted.
    async fn del(&self, key: &str) -> bool;

    /// Returns `true` when `key` currently holds a live entry.
    async fn exists(&self, key: &str) -> bool;

    /// Fetches several keys at once.
    ///
    /// The result is positionally aligned with `keys`; a disconnected
    /// backend yields all-`None`.
    async fn mget(&self, keys: &[String]) -> Vec<Option<String>>;

    /// Stores several pairs at once (pipelined), all with the same `ttl`.
    async fn mset(&self, pairs: &[(String, String)], ttl: Option<Duration>) -> bool;

    /// Returns every key starting with `prefix`.
    ///
    /// Empty on a disconnected backend; a scan is never required for
    /// correctness, only for invalidation coverage.
    async fn scan(&self, prefix: &str) -> Vec<String>;

    /// Round-trip liveness check.
    async fn ping(&self) -> bool;

    /// Current value of the shared connection flag.
    fn is_connected(&self) -> bool;

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// Shared handle to a cache backend.
pub type DynCacheBackend = Arc<dyn CacheBackend>;

/// Selects and constructs a backend from configuration.
///
/// Disabled caching or a missing URL yields a [`DisabledBackend`]. An
/// unreachable backend at startup still yields a usable handle: it starts
/// disconnected and re-probes in the background, so construction never
/// fails on connectivity. Only an unparseable URL degrades to disabled,
/// with a warning.
pub async fn connect(config: &CacheConfig) -> DynCacheBackend {
    if !config.enabled {
        info!("cache disabled by configuration");
        return Arc::new(DisabledBackend);
    }
    let Some(url) = config.url.as_deref() else {
        info!("no cache URL configured, caching disabled");
        return Arc::new(DisabledBackend);
    };

    match redis::RedisBackend::connect(url, config).await {
        Ok(backend) => Arc::new(backend),
        Err(err) => {
            warn!(error = %err, "cache backend configuration rejected, caching disabled");
            Arc::new(DisabledBackend)
        }
    }
}

/// Backend used when caching is switched off: permanently disconnected,
/// every operation is an immediate no-op miss.
pub struct DisabledBackend;

#[async_trait]
impl CacheBackend for DisabledBackend {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> bool {
        false
    }

    async fn del(&self, _key: &str) -> bool {
        false
    }

    async fn exists(&self, _key: &str) -> bool {
        false
    }

    async fn mget(&self, keys: &[String]) -> Vec<Option<String>> {
        vec![None; keys.len()]
    }

    async fn mset(&self, _pairs: &[(String, String)], _ttl: Option<Duration>) -> bool {
        false
    }

    async fn scan(&self, _prefix: &str) -> Vec<String> {
        Vec::new()
    }

    async fn ping(&self) -> bool {
        false
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "disabled"
    }
}

/// Serializes a value for storage.
///
/// A value that cannot be serialized is dropped with a warning; the cache
/// write is skipped rather than failed.
pub(crate) fn encode<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(raw) => Some(raw),
        Err(err) => {
            warn!(error = %err, "failed to encode cache value, skipping write");
            None
        }
    }
}

/// Deserializes a stored value.
///
/// An undecodable payload reads as a miss: the entry was written by an
/// older shape or corrupted in transit, and the authoritative source will
/// repopulate it.
pub(crate) fn decode<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "discarding undecodable cache entry");
            None
        }
    }
}
