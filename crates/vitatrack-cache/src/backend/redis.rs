//! Redis cache backend.
//!
//! A thin fail-open client over a pooled Redis connection. The shared
//! `connected` flag is the only mutable state: it is written by
//! connection-lifecycle transitions (initial probe, operation failure,
//! successful re-probe) and read by every operation, which short-circuits
//! to its empty value while the flag is down. After a lost connection a
//! single background task re-probes with capped exponential backoff.

use async_trait::async_trait;
use deadpool_redis::{Pool, Runtime};
use redis::AsyncCommands;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::CacheResult;
use crate::backend::CacheBackend;
use crate::config::{CacheConfig, ReconnectConfig};
use crate::error::CacheError;

/// Cache backend over a remote Redis instance.
pub struct RedisBackend {
    inner: Arc<Inner>,
}

struct Inner {
    pool: Pool,
    op_timeout: Duration,
    reconnect: ReconnectConfig,
    /// Written by connection-lifecycle events, read by every operation.
    connected: AtomicBool,
    /// Guards against spawning more than one re-probe task.
    reconnecting: AtomicBool,
}

impl Inner {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    async fn conn(&self) -> Result<deadpool_redis::Connection, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|err| CacheError::connection(err.to_string()))
    }

    /// One PING round trip, bounded by the operation timeout.
    async fn probe(&self) -> bool {
        let Ok(mut conn) = self.pool.get().await else {
            return false;
        };
        let cmd = redis::cmd("PING");
        let ping = cmd.query_async::<_, String>(&mut conn);
        matches!(timeout(self.op_timeout, ping).await, Ok(Ok(_)))
    }
}

impl RedisBackend {
    /// Builds the pool and performs the initial liveness probe.
    ///
    /// An unreachable server is not an error here: the backend starts
    /// disconnected and re-probes in the background.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Configuration` only when the URL or pool
    /// settings are unusable.
    pub async fn connect(url: &str, config: &CacheConfig) -> CacheResult<Self> {
        let pool = deadpool_redis::Config::from_url(url)
            .builder()
            .map_err(|err| CacheError::configuration(err.to_string()))?
            .max_size(config.pool_size)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|err| CacheError::configuration(err.to_string()))?;

        let backend = Self {
            inner: Arc::new(Inner {
                pool,
                op_timeout: config.op_timeout,
                reconnect: config.reconnect.clone(),
                connected: AtomicBool::new(false),
                reconnecting: AtomicBool::new(false),
            }),
        };

        if backend.inner.probe().await {
            backend.inner.connected.store(true, Ordering::SeqCst);
            info!(url, "cache backend connected");
        } else {
            warn!(url, "cache backend unreachable at startup, will keep probing");
            backend.schedule_reconnect();
        }

        Ok(backend)
    }

    /// Logs an absorbed fault and, for connectivity failures, drops the
    /// connection flag and starts the re-probe task.
    fn absorb(&self, op: &'static str, key: &str, err: &CacheError) {
        warn!(op, key, error = %err, "cache operation failed, treating as miss");
        if err.is_connectivity() {
            self.mark_disconnected();
        }
    }

    fn mark_disconnected(&self) {
        if self.inner.connected.swap(false, Ordering::SeqCst) {
            warn!("cache backend connection lost");
        }
        self.schedule_reconnect();
    }

    fn schedule_reconnect(&self) {
        if self.inner.reconnecting.swap(true, Ordering::SeqCst) {
            return;
        }
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut backoff = inner.reconnect.initial_backoff;
            loop {
                tokio::time::sleep(backoff).await;
                if inner.probe().await {
                    inner.connected.store(true, Ordering::SeqCst);
                    inner.reconnecting.store(false, Ordering::SeqCst);
                    info!("cache backend reconnected");
                    return;
                }
                debug!(
                    backoff_secs = backoff.as_secs(),
                    "cache backend still unreachable"
                );
                backoff = (backoff * 2).min(inner.reconnect.max_backoff);
            }
        });
    }

    async fn try_get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.inner.conn().await?;
        let value: Option<String> = timeout(self.inner.op_timeout, conn.get(key))
            .await
            .map_err(|_| CacheError::timeout("get"))??;
        Ok(value)
    }

    async fn try_set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let mut conn = self.inner.conn().await?;
        match ttl {
            Some(ttl) => {
                timeout(self.inner.op_timeout, conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()))
                    .await
                    .map_err(|_| CacheError::timeout("set"))??;
            }
            None => {
                timeout(self.inner.op_timeout, conn.set::<_, _, ()>(key, value))
                    .await
                    .map_err(|_| CacheError::timeout("set"))??;
            }
        }
        Ok(())
    }

    async fn try_del(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.inner.conn().await?;
        let removed: u64 = timeout(self.inner.op_timeout, conn.del(key))
            .await
            .map_err(|_| CacheError::timeout("del"))??;
        Ok(removed > 0)
    }

    async fn try_exists(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.inner.conn().await?;
        let exists: bool = timeout(self.inner.op_timeout, conn.exists(key))
            .await
            .map_err(|_| CacheError::timeout("exists"))??;
        Ok(exists)
    }

    async fn try_mget(&self, keys: &[String]) -> Result<Vec<Option<String>>, CacheError> {
        let mut conn = self.inner.conn().await?;
        let mut cmd = redis::cmd("MGET");
        for key in keys {
            cmd.arg(key);
        }
        let fut = cmd.query_async::<_, Vec<Option<String>>>(&mut conn);
        let values = timeout(self.inner.op_timeout, fut)
            .await
            .map_err(|_| CacheError::timeout("mget"))??;
        Ok(values)
    }

    async fn try_mset(
        &self,
        pairs: &[(String, String)],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let mut conn = self.inner.conn().await?;
        let mut pipe = redis::pipe();
        for (key, value) in pairs {
            match ttl {
                Some(ttl) => {
                    pipe.set_ex(key, value, ttl.as_secs()).ignore();
                }
                None => {
                    pipe.set(key, value).ignore();
                }
            }
        }
        let fut = pipe.query_async::<_, ()>(&mut conn);
        timeout(self.inner.op_timeout, fut)
            .await
            .map_err(|_| CacheError::timeout("mset"))??;
        Ok(())
    }

    async fn try_scan(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.inner.conn().await?;
        let pattern = format!("{prefix}*");
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let mut cmd = redis::cmd("SCAN");
            cmd.arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100);
            let fut = cmd.query_async::<_, (u64, Vec<String>)>(&mut conn);
            let (next, mut batch) = timeout(self.inner.op_timeout, fut)
                .await
                .map_err(|_| CacheError::timeout("scan"))??;
            keys.append(&mut batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(keys)
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Option<String> {
        if !self.inner.is_connected() {
            return None;
        }
        match self.try_get(key).await {
            Ok(value) => value,
            Err(err) => {
                self.absorb("get", key, &err);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> bool {
        if !self.inner.is_connected() {
            return false;
        }
        match self.try_set(key, value, ttl).await {
            Ok(()) => true,
            Err(err) => {
                self.absorb("set", key, &err);
                false
            }
        }
    }

    async fn del(&self, key: &str) -> bool {
        if !self.inner.is_connected() {
            return false;
        }
        match self.try_del(key).await {
            Ok(removed) => removed,
            Err(err) => {
                self.absorb("del", key, &err);
                false
            }
        }
    }

    async fn exists(&self, key: &str) -> bool {
        if !self.inner.is_connected() {
            return false;
        }
        match self.try_exists(key).await {
            Ok(exists) => exists,
            Err(err) => {
                self.absorb("exists", key, &err);
                false
            }
        }
    }

    async fn mget(&self, keys: &[String]) -> Vec<Option<String>> {
        if keys.is_empty() || !self.inner.is_connected() {
            return vec![None; keys.len()];
        }
        match self.try_mget(keys).await {
            Ok(values) => values,
            Err(err) => {
                self.absorb("mget", "<multi>", &err);
                vec![None; keys.len()]
            }
        }
    }

    async fn mset(&self, pairs: &[(String, String)], ttl: Option<Duration>) -> bool {
        if pairs.is_empty() {
            return true;
        }
        if !self.inner.is_connected() {
            return false;
        }
        match self.try_mset(pairs, ttl).await {
            Ok(()) => true,
            Err(err) => {
                self.absorb("mset", "<multi>", &err);
                false
            }
        }
    }

    async fn scan(&self, prefix: &str) -> Vec<String> {
        if !self.inner.is_connected() {
            return Vec::new();
        }
        match self.try_scan(prefix).await {
            Ok(keys) => keys,
            Err(err) => {
                self.absorb("scan", prefix, &err);
                Vec::new()
            }
        }
    }

    async fn ping(&self) -> bool {
        if !self.inner.is_connected() {
            return false;
        }
        if self.inner.probe().await {
            true
        } else {
            self.mark_disconnected();
            false
        }
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
