//! # vitatrack-credential
//!
//! Password-at-rest handling for the VitaTrack server.
//!
//! This crate provides:
//! - Slow, salted key derivation (PBKDF2-HMAC-SHA512)
//! - Envelope encryption of stored credentials (AES-256-CBC)
//! - Verification by decrypt-and-compare
//! - Secure password generation
//! - Deterministic password strength scoring
//!
//! ## Overview
//!
//! A stored credential is an *envelope*: base64(salt ‖ IV ‖ ciphertext),
//! where the ciphertext is the password itself encrypted under a key
//! derived from that password and the per-credential salt. Verification
//! re-derives the key from the candidate password and the stored salt,
//! decrypts, and compares plaintexts. The scheme is reversible on purpose,
//! for compatibility with envelopes already in production; see the module
//! docs in [`cipher`] for the trade-off.
//!
//! ## Modules
//!
//! - [`kdf`] - Password key derivation
//! - [`envelope`] - Envelope encoding and decoding
//! - [`cipher`] - Hashing and verification
//! - [`generate`] - Secure password generation
//! - [`strength`] - Password strength scoring

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod generate;
pub mod kdf;
pub mod strength;

pub use cipher::{hash_password, verify_password};
pub use envelope::Envelope;
pub use error::CredentialError;
pub use generate::generate_password;
pub use strength::{Strength, StrengthCriteria, StrengthReport, evaluate_strength};

/// Type alias for credential operation results.
pub type CredentialResult<T> = Result<T, CredentialError>;
