//! Cache layer configuration.
//!
//! Plain serde structs with defaults that match the deployed conventions.
//! Bootstrap wires these from whatever configuration source the process
//! uses; [`CacheConfig::from_env`] covers the two environment toggles the
//! deployment relies on.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable naming the backend address.
pub const ENV_CACHE_URL: &str = "VITATRACK_CACHE_URL";

/// Environment variable toggling the cache layer on.
pub const ENV_CACHE_ENABLED: &str = "VITATRACK_CACHE_ENABLED";

/// Root cache layer configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [cache]
/// enabled = true
/// url = "redis://127.0.0.1:6379"
///
/// [cache.ttl]
/// session = "7d"
/// profile = "30m"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable/disable the cache layer entirely.
    /// When disabled, every component degrades to always-miss.
    pub enabled: bool,

    /// Backend address, e.g. `redis://127.0.0.1:6379`.
    /// Absent is equivalent to disabled.
    pub url: Option<String>,

    /// Upper bound on a single backend operation.
    /// An operation that exceeds it reads as a cache miss.
    #[serde(with = "humantime_serde")]
    pub op_timeout: Duration,

    /// Connection pool size.
    pub pool_size: usize,

    /// Reconnection policy after a lost connection.
    pub reconnect: ReconnectConfig,

    /// Per-component TTL conventions.
    pub ttl: TtlConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
            op_timeout: Duration::from_secs(2),
            pool_size: 16,
            reconnect: ReconnectConfig::default(),
            ttl: TtlConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Builds a configuration from the environment toggles.
    ///
    /// `VITATRACK_CACHE_URL` names the backend; `VITATRACK_CACHE_ENABLED`
    /// must parse truthy ("1", "true", "yes", "on"). Absence of either
    /// variable yields a disabled cache.
    #[must_use]
    pub fn from_env() -> Self {
        let url = std::env::var(ENV_CACHE_URL)
            .ok()
            .filter(|value| !value.is_empty());
        let enabled = std::env::var(ENV_CACHE_ENABLED)
            .map(|value| parse_truthy(&value))
            .unwrap_or(false);

        Self {
            enabled: enabled && url.is_some(),
            url,
            ..Self::default()
        }
    }
}

/// Reconnection policy: capped exponential backoff.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// Delay before the first re-probe after a lost connection.
    #[serde(with = "humantime_serde")]
    pub initial_backoff: Duration,

    /// Ceiling for the doubling re-probe delay.
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// Per-component TTL conventions.
///
/// The defaults reproduce the deployed values; changing them only affects
/// freshness, never correctness, since every cached value has an
/// authoritative source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TtlConfig {
    /// Session entries.
    #[serde(with = "humantime_serde")]
    pub session: Duration,

    /// Health snapshot entries.
    #[serde(with = "humantime_serde")]
    pub profile: Duration,

    /// Generic request-cache wrapper entries.
    #[serde(with = "humantime_serde")]
    pub request: Duration,

    /// Rule-based recommendation results.
    #[serde(with = "humantime_serde")]
    pub recommendation_rule: Duration,

    /// Model-derived recommendation results (more expensive to recompute,
    /// so cached longer).
    #[serde(with = "humantime_serde")]
    pub recommendation_model: Duration,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            session: Duration::from_secs(604_800),          // 7 days
            profile: Duration::from_secs(1_800),            // 30 minutes
            request: Duration::from_secs(3_600),            // 1 hour
            recommendation_rule: Duration::from_secs(7_200), // 2 hours
            recommendation_model: Duration::from_secs(10_800), // 3 hours
        }
    }
}

fn parse_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
