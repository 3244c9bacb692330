//! Secure password generation.
//!
//! Used by the account-recovery flow to propose replacement passwords
//! that always pass strength validation.

use rand::Rng;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{}<>?";

/// Generates a random password of `length` characters.
///
/// The result always contains at least one uppercase letter, one lowercase
/// letter, one digit, and one symbol; the remaining positions are drawn
/// uniformly from the full alphabet and the whole sequence is shuffled.
/// Every choice, including the shuffle, uses the OS random source.
///
/// Lengths below 4 are raised to 4 so the one-per-class guarantee can hold.
#[must_use]
pub fn generate_password(length: usize) -> String {
    let length = length.max(4);

    let alphabet: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS].concat();

    let mut chars: Vec<char> = Vec::with_capacity(length);
    for class in [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS] {
        chars.push(class[OsRng.gen_range(0..class.len())] as char);
    }
    while chars.len() < length {
        chars.push(alphabet[OsRng.gen_range(0..alphabet.len())] as char);
    }

    // Without the shuffle the first four positions would leak their class.
    chars.shuffle(&mut OsRng);
    chars.into_iter().collect()
}
