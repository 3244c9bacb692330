//! Cache layer error types.
//!
//! The public cache API never surfaces these: backend faults are absorbed
//! at the operation boundary and converted into miss/no-op return values.
//! The error type exists for internal plumbing, construction paths, and
//! log context.

/// Errors that can occur during cache backend operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backend connection could not be established or was lost.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// A backend operation exceeded its time bound.
    #[error("Cache operation timed out: {op}")]
    Timeout {
        /// The operation that timed out.
        op: &'static str,
    },

    /// The backend rejected or failed an operation.
    #[error("Backend error: {0}")]
    Backend(#[from] redis::RedisError),

    /// A value could not be serialized for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The cache configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl CacheError {
    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout(op: &'static str) -> Self {
        Self::Timeout { op }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this failure says the backend is unreachable,
    /// as opposed to a per-value problem like an undecodable payload.
    ///
    /// Connectivity failures drop the shared `connected` flag and start
    /// the reconnect probe; non-connectivity failures only cost the one
    /// operation.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Connection { .. } | Self::Timeout { .. } => true,
            Self::Backend(err) => {
                err.is_io_error()
                    || err.is_connection_refusal()
                    || err.is_connection_dropped()
                    || err.is_timeout()
            }
            Self::Serialization(_) | Self::Configuration { .. } => false,
        }
    }
}
