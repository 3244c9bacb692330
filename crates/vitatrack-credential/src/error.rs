//! Credential error types.
//!
//! Verification is deliberately absent from this taxonomy: a decryption
//! failure while checking a candidate password is evidence of a wrong
//! password, reported as a boolean `false` by [`crate::verify_password`],
//! never as an error.

/// Errors that can occur while creating a stored credential.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The salt passed to key derivation has the wrong length.
    #[error("Invalid salt length: expected {expected} bytes, got {actual}")]
    InvalidSaltLength {
        /// The required salt length in bytes.
        expected: usize,
        /// The length that was actually supplied.
        actual: usize,
    },

    /// The cipher primitive rejected its inputs.
    ///
    /// Key and IV lengths are fixed by this crate, so this should not occur
    /// in practice; it is surfaced rather than panicked on.
    #[error("Encryption error: {message}")]
    Encryption {
        /// Description of the primitive failure.
        message: String,
    },

    /// A stored envelope could not be decoded.
    #[error("Malformed envelope: {message}")]
    MalformedEnvelope {
        /// Description of why the envelope is malformed.
        message: String,
    },
}

impl CredentialError {
    /// Creates a new `InvalidSaltLength` error.
    #[must_use]
    pub fn invalid_salt_length(expected: usize, actual: usize) -> Self {
        Self::InvalidSaltLength { expected, actual }
    }

    /// Creates a new `Encryption` error.
    #[must_use]
    pub fn encryption(message: impl Into<String>) -> Self {
        Self::Encryption {
            message: message.into(),
        }
    }

    /// Creates a new `MalformedEnvelope` error.
    #[must_use]
    pub fn malformed_envelope(message: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            message: message.into(),
        }
    }
}
