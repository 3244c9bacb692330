//! # vitatrack-cache
//!
//! TTL result-cache layer for the VitaTrack server.
//!
//! This crate provides:
//! - An object-safe async [`CacheBackend`] abstraction over a remote
//!   key-value store, with Redis and in-memory implementations
//! - Session token caching ([`SessionStore`])
//! - Per-user health snapshot caching ([`ProfileCache`])
//! - Profile-bucketed recommendation memoization ([`ResultMemoizer`])
//! - Post-mutation invalidation ([`CacheInvalidator`])
//! - A read-through request cache wrapper ([`RequestCache`])
//!
//! ## Fail-open contract
//!
//! The cache is an optional accelerator over the authoritative data path,
//! never a dependency of it. Every backend operation absorbs backend
//! faults at its own boundary: unreachable backend, timeout, or an
//! undecodable stored payload all read as a cache miss, and callers fall
//! through to the source of truth. A cache outage degrades latency only.
//!
//! ## Modules
//!
//! - [`backend`] - Backend trait, Redis and in-memory implementations
//! - [`config`] - Cache layer configuration and TTL conventions
//! - [`keys`] - Wire-compatible cache key naming
//! - [`session`] - Session token store
//! - [`profile`] - Health snapshot cache
//! - [`memoizer`] - Bucketed recommendation memoization
//! - [`invalidator`] - Post-mutation invalidation
//! - [`request_cache`] - Read-through request caching
//! - [`diagnostics`] - Backend round-trip probe

pub mod backend;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod invalidator;
pub mod keys;
pub mod memoizer;
pub mod profile;
pub mod request_cache;
pub mod session;

pub use backend::memory::MemoryBackend;
pub use backend::redis::RedisBackend;
pub use backend::{CacheBackend, DisabledBackend, DynCacheBackend, connect};
pub use config::{CacheConfig, ReconnectConfig, TtlConfig};
pub use error::CacheError;
pub use invalidator::{CacheInvalidator, InvalidationDomain};
pub use memoizer::{MemoizedResult, ResultMemoizer};
pub use profile::{CachedProfile, ProfileCache};
pub use request_cache::RequestCache;
pub use session::{SessionEntry, SessionStore};

/// Type alias for cache plumbing results.
///
/// The public component APIs are fail-open and infallible; this alias is
/// used by internal backend plumbing and by construction paths.
pub type CacheResult<T> = Result<T, CacheError>;
