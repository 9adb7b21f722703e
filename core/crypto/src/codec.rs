//! Secret codecs.
//!
//! A codec turns a plaintext secret and the encryption key into a string
//! that can be persisted, and recovers the secret from it later. Decoding
//! never panics; callers that only need a display value use
//! [`SecretCodec::decode`], which substitutes [`DECRYPTION_FAILED`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use zeroize::Zeroizing;

use crate::aead::SealedCodec;
use crate::keys::EncryptionKey;
use passvault_common::{Error, Result};

/// Value shown in place of a secret that could not be recovered.
pub const DECRYPTION_FAILED: &str = "Decryption Failed";

/// Reversible transform between plaintext secrets and stored strings.
pub trait SecretCodec: Send + Sync {
    /// Get the codec name (e.g., "legacy", "sealed").
    fn name(&self) -> &str;

    /// Encode a secret for storage.
    ///
    /// # Postconditions
    /// - `try_decode` with the same key recovers `secret`
    fn encode(&self, secret: &str, key: &EncryptionKey) -> Result<String>;

    /// Recover a secret from its stored form.
    ///
    /// # Errors
    /// - `DecodeFailure` if the input is malformed or the key does not match
    fn try_decode(&self, ciphertext: &str, key: &EncryptionKey) -> Result<String>;

    /// Recover a secret, returning [`DECRYPTION_FAILED`] on any failure.
    fn decode(&self, ciphertext: &str, key: &EncryptionKey) -> String {
        match self.try_decode(ciphertext, key) {
            Ok(secret) => secret,
            Err(e) => {
                warn!(codec = self.name(), error = %e, "Secret decode failed");
                DECRYPTION_FAILED.to_string()
            }
        }
    }
}

/// Codec selection, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// Base64 of `secret + key`. Compatible with existing stored entries.
    #[default]
    Legacy,
    /// XChaCha20-Poly1305 with a per-entry nonce.
    Sealed,
}

impl CodecKind {
    /// Instantiate the selected codec.
    pub fn build(self) -> Arc<dyn SecretCodec> {
        match self {
            CodecKind::Legacy => Arc::new(LegacyCodec),
            CodecKind::Sealed => Arc::new(SealedCodec),
        }
    }
}

/// Base64 encoding of the secret with the key appended.
///
/// This is an obfuscation, not encryption: anyone holding the key string
/// can read every entry. Decoding removes the first occurrence of the key,
/// so a secret that itself contains the key string is not recovered
/// correctly.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyCodec;

impl SecretCodec for LegacyCodec {
    fn name(&self) -> &str {
        "legacy"
    }

    fn encode(&self, secret: &str, key: &EncryptionKey) -> Result<String> {
        let mut combined = Zeroizing::new(String::with_capacity(secret.len() + key.as_str().len()));
        combined.push_str(secret);
        combined.push_str(key.as_str());
        Ok(STANDARD.encode(combined.as_bytes()))
    }

    fn try_decode(&self, ciphertext: &str, key: &EncryptionKey) -> Result<String> {
        let bytes = STANDARD
            .decode(ciphertext)
            .map_err(|e| Error::DecodeFailure(format!("Invalid base64: {}", e)))?;

        // Older records hold one byte per character (Latin-1).
        let decoded = Zeroizing::new(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                let raw = Zeroizing::new(e.into_bytes());
                raw.iter().map(|&b| b as char).collect()
            }
        });

        if !decoded.contains(key.as_str()) {
            return Err(Error::DecodeFailure(
                "Encryption key does not match".to_string(),
            ));
        }

        Ok(decoded.replacen(key.as_str(), "", 1))
    }
}
