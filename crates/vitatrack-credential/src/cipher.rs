//! Password hashing and verification.
//!
//! Unusual by design: the stored credential is a reversible AES-256-CBC
//! envelope of the password itself rather than a one-way digest, so
//! verification decrypts and compares instead of re-hashing. The scheme
//! stays bit-for-bit compatible with envelopes already persisted by the
//! deployed system; a green-field deployment would prefer a keyed one-way
//! hash (see DESIGN.md).
//!
//! # Security
//!
//! - Salt and IV are fresh per call from the OS random source
//! - The key is derived with PBKDF2-HMAC-SHA512 (100k iterations)
//! - Verification never errors: every decode or decrypt failure is
//!   evidence of a wrong password and folds into `false`

use aes::Aes256;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::CredentialResult;
use crate::envelope::{Envelope, IV_LEN};
use crate::error::CredentialError;
use crate::kdf::{self, SALT_LEN};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Seals a password into a stored credential envelope.
///
/// Every call generates a fresh salt and IV, so hashing the same password
/// twice never produces the same envelope.
///
/// # Errors
///
/// Returns `CredentialError::Encryption` if the cipher primitive rejects
/// the derived key or IV. Both lengths are fixed by this crate, so this is
/// not expected to occur.
///
/// # Example
///
/// ```
/// use vitatrack_credential::{hash_password, verify_password};
///
/// let envelope = hash_password("Tr0ub4dor&3").unwrap();
/// assert!(verify_password("Tr0ub4dor&3", &envelope));
/// assert!(!verify_password("Tr0ub4dor&4", &envelope));
/// ```
pub fn hash_password(password: &str) -> CredentialResult<String> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let key = kdf::derive(password, &salt)?;
    let cipher = Aes256CbcEnc::new_from_slices(&key, &iv)
        .map_err(|err| CredentialError::encryption(err.to_string()))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(password.as_bytes());

    Ok(Envelope {
        salt,
        iv,
        ciphertext,
    }
    .encode())
}

/// Checks a candidate password against a stored envelope.
///
/// Returns `false` on any failure: undecodable envelope, wrong key,
/// padding mismatch. A wrong password is not a system fault, so this
/// function has no error path at all.
#[must_use]
pub fn verify_password(candidate: &str, encoded: &str) -> bool {
    let Ok(envelope) = Envelope::decode(encoded) else {
        return false;
    };
    let Ok(key) = kdf::derive(candidate, &envelope.salt) else {
        return false;
    };
    let Ok(cipher) = Aes256CbcDec::new_from_slices(&key, &envelope.iv) else {
        return false;
    };
    let Ok(plaintext) = cipher.decrypt_padded_vec_mut::<Pkcs7>(&envelope.ciphertext) else {
        return false;
    };
    plaintext == candidate.as_bytes()
}
