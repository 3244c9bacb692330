//! Credential envelope encoding.
//!
//! A stored credential is the concatenation salt ‖ IV ‖ ciphertext,
//! base64-encoded into a single opaque string. The persistence layer
//! stores and retrieves that string verbatim; only this crate looks
//! inside it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::CredentialError;
use crate::kdf::SALT_LEN;

/// IV length in bytes (one AES block).
pub const IV_LEN: usize = 16;

/// A decoded credential envelope.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Per-credential key-derivation salt.
    pub salt: [u8; SALT_LEN],
    /// CBC initialization vector, fresh per encryption.
    pub iv: [u8; IV_LEN],
    /// PKCS7-padded AES-256-CBC ciphertext of the password.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Encodes the envelope as base64(salt ‖ iv ‖ ciphertext).
    #[must_use]
    pub fn encode(&self) -> String {
        let mut blob = Vec::with_capacity(SALT_LEN + IV_LEN + self.ciphertext.len());
        blob.extend_from_slice(&self.salt);
        blob.extend_from_slice(&self.iv);
        blob.extend_from_slice(&self.ciphertext);
        STANDARD.encode(blob)
    }

    /// Decodes a stored envelope string.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::MalformedEnvelope` if the string is not
    /// valid base64, is too short to hold a salt, IV, and one cipher
    /// block, or carries a ciphertext that is not block-aligned.
    pub fn decode(encoded: &str) -> Result<Self, CredentialError> {
        let blob = STANDARD
            .decode(encoded)
            .map_err(|err| CredentialError::malformed_envelope(err.to_string()))?;

        if blob.len() < SALT_LEN + IV_LEN + IV_LEN {
            return Err(CredentialError::malformed_envelope(format!(
                "blob too short: {} bytes",
                blob.len()
            )));
        }

        let ciphertext = blob[SALT_LEN + IV_LEN..].to_vec();
        if ciphertext.len() % IV_LEN != 0 {
            return Err(CredentialError::malformed_envelope(
                "ciphertext is not block-aligned",
            ));
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&blob[..SALT_LEN]);
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&blob[SALT_LEN..SALT_LEN + IV_LEN]);

        Ok(Self {
            salt,
            iv,
            ciphertext,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            salt: [0x11; SALT_LEN],
            iv: [0x22; IV_LEN],
            ciphertext: vec![0x33; 32],
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let envelope = sample();
        let encoded = envelope.encode();
        let decoded = Envelope::decode(&encoded).unwrap();

        assert_eq!(decoded.salt, envelope.salt);
        assert_eq!(decoded.iv, envelope.iv);
        assert_eq!(decoded.ciphertext, envelope.ciphertext);
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        let result = Envelope::decode("not*base64*at*all");
        assert!(matches!(
            result,
            Err(CredentialError::MalformedEnvelope { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_blob() {
        // Salt plus IV but no ciphertext block.
        let blob = vec![0u8; SALT_LEN + IV_LEN];
        let result = Envelope::decode(&STANDARD.encode(blob));
        assert!(matches!(
            result,
            Err(CredentialError::MalformedEnvelope { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_unaligned_ciphertext() {
        let blob = vec![0u8; SALT_LEN + IV_LEN + 17];
        let result = Envelope::decode(&STANDARD.encode(blob));
        assert!(matches!(
            result,
            Err(CredentialError::MalformedEnvelope { .. })
        ));
    }

    #[test]
    fn test_encoded_form_is_opaque_ascii() {
        let encoded = sample().encode();
        assert!(encoded.is_ascii());
        assert!(!encoded.contains(char::is_whitespace));
    }
}
