//! SHA-256 digests rendered as lowercase hex.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const HEX_DIGEST_LENGTH: usize = 64;

/// Hash a UTF-8 string with SHA-256 and return the lowercase hex digest.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Produce a fresh random value rendered as a decimal string.
///
/// Used as hash input for salts and key material; the output is never
/// stored directly.
pub fn random_token() -> String {
    rand::thread_rng().gen::<u64>().to_string()
}
