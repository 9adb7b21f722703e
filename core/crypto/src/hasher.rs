//! Salted password hashing for account authentication.
//!
//! Hashes are the SHA-256 hex digest of `password + salt`. The format is
//! fixed so that accounts created earlier keep verifying.

use subtle::ConstantTimeEq;

use crate::digest::{random_token, sha256_hex};

/// Deterministic, salted one-way transform for login passwords.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Produce a fresh salt: the hex digest of a random value.
    pub fn make_salt() -> String {
        sha256_hex(&random_token())
    }

    /// Hash a password with a salt.
    ///
    /// # Postconditions
    /// - Same inputs always produce the same 64-character hex digest
    pub fn hash(password: &str, salt: &str) -> String {
        let mut input = String::with_capacity(password.len() + salt.len());
        input.push_str(password);
        input.push_str(salt);
        sha256_hex(&input)
    }

    /// Check a password against a stored hash.
    ///
    /// This performs constant-time comparison to prevent timing attacks.
    pub fn verify(password: &str, salt: &str, expected_hash: &str) -> bool {
        let computed = Self::hash(password, salt);
        computed.as_bytes().ct_eq(expected_hash.as_bytes()).into()
    }
}
