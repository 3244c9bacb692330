//! Password key derivation.
//!
//! Turns a password and a per-credential random salt into the 256-bit
//! symmetric key that seals the credential envelope. The derivation is
//! PBKDF2-HMAC-SHA512 with a fixed iteration count: deterministic for
//! identical `(password, salt)` inputs, and slow enough that bulk candidate
//! guessing carries a real hardware cost.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;

use crate::error::CredentialError;

/// Required salt length in bytes.
pub const SALT_LEN: usize = 32;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count.
pub const ITERATIONS: u32 = 100_000;

/// Derives a 256-bit symmetric key from a password and salt.
///
/// The same `(password, salt)` pair always derives the same key; the salt
/// must be [`SALT_LEN`] bytes of cryptographically secure randomness,
/// generated once per credential.
///
/// # Errors
///
/// Returns `CredentialError::InvalidSaltLength` if `salt` is not exactly
/// [`SALT_LEN`] bytes. There are no other failure modes.
pub fn derive(password: &str, salt: &[u8]) -> Result<[u8; KEY_LEN], CredentialError> {
    if salt.len() != SALT_LEN {
        return Err(CredentialError::invalid_salt_length(SALT_LEN, salt.len()));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha512>(password.as_bytes(), salt, ITERATIONS, &mut key);
    Ok(key)
}
