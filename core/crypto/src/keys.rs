//! The process-wide encryption key.
//!
//! The key is an opaque string. It is held in memory only as long as an
//! operation needs it and is zeroized on drop.

use chrono::Utc;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::digest::{random_token, sha256_hex};
use passvault_common::{Error, Result};

/// Symmetric key used by secret codecs.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    key: String,
}

impl EncryptionKey {
    /// Wrap a persisted key value.
    ///
    /// # Errors
    /// - Returns error if the value is empty
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::Validation(
                "Encryption key cannot be empty".to_string(),
            ));
        }
        Ok(Self { key })
    }

    /// Generate a fresh key.
    ///
    /// The key is the SHA-256 hex digest of a random value concatenated
    /// with the current timestamp in milliseconds.
    pub fn generate() -> Self {
        let material = format!("{}{}", random_token(), Utc::now().timestamp_millis());
        Self {
            key: sha256_hex(&material),
        }
    }

    /// Get the key string.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptionKey([REDACTED])")
    }
}
