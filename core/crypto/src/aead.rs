//! Authenticated secret codec using XChaCha20-Poly1305.
//!
//! XChaCha20-Poly1305 provides both confidentiality and authenticity,
//! with a 24-byte nonce that is safe for random generation. The cipher key
//! is derived from the stored encryption key string with Blake2b, so the
//! same key slot serves both codecs.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use chacha20poly1305::{
    aead::{generic_array::GenericArray, Aead, AeadCore, KeyInit, OsRng},
    XChaCha20Poly1305,
};
use zeroize::Zeroizing;

use crate::codec::SecretCodec;
use crate::keys::EncryptionKey;
use passvault_common::{Error, Result};

/// Length of the derived cipher key in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Nonce size for XChaCha20-Poly1305 (24 bytes).
pub const NONCE_SIZE: usize = 24;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

const KEY_CONTEXT: &[u8] = b"passvault-sealed-secret-v1";

/// Derive the 32-byte cipher key from the stored key string.
fn derive_cipher_key(key: &EncryptionKey) -> Zeroizing<[u8; KEY_LENGTH]> {
    let mut hasher = Blake2b::<U32>::new();
    hasher.update(KEY_CONTEXT);
    hasher.update(key.as_str().as_bytes());

    let mut derived = Zeroizing::new([0u8; KEY_LENGTH]);
    derived.copy_from_slice(&hasher.finalize());
    derived
}

/// Encrypt plaintext using XChaCha20-Poly1305.
///
/// # Postconditions
/// - Returns nonce || ciphertext || tag
/// - The nonce is randomly generated
pub fn encrypt(key: &[u8; KEY_LENGTH], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(key));
    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| Error::Crypto(format!("Encryption failed: {}", e)))?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// Decrypt ciphertext using XChaCha20-Poly1305.
///
/// # Errors
/// - Returns error if ciphertext is too short
/// - Returns error if authentication fails (wrong key or tampered data)
pub fn decrypt(key: &[u8; KEY_LENGTH], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
        return Err(Error::DecodeFailure("Ciphertext too short".to_string()));
    }

    let (nonce_bytes, encrypted) = ciphertext.split_at(NONCE_SIZE);
    let nonce = GenericArray::from_slice(nonce_bytes);

    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(key));

    cipher
        .decrypt(nonce, encrypted)
        .map_err(|_| Error::DecodeFailure("Authentication failed".to_string()))
}

/// Secret codec backed by authenticated encryption.
///
/// Stored form is base64(nonce || ciphertext || tag).
#[derive(Debug, Clone, Copy, Default)]
pub struct SealedCodec;

impl SecretCodec for SealedCodec {
    fn name(&self) -> &str {
        "sealed"
    }

    fn encode(&self, secret: &str, key: &EncryptionKey) -> Result<String> {
        let cipher_key = derive_cipher_key(key);
        let sealed = encrypt(&cipher_key, secret.as_bytes())?;
        Ok(STANDARD.encode(sealed))
    }

    fn try_decode(&self, ciphertext: &str, key: &EncryptionKey) -> Result<String> {
        let sealed = STANDARD
            .decode(ciphertext)
            .map_err(|e| Error::DecodeFailure(format!("Invalid base64: {}", e)))?;

        let cipher_key = derive_cipher_key(key);
        let plaintext = decrypt(&cipher_key, &sealed)?;

        String::from_utf8(plaintext)
            .map_err(|_| Error::DecodeFailure("Decrypted data is not UTF-8".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DECRYPTION_FAILED;

    fn key() -> EncryptionKey {
        EncryptionKey::new("0f1e2d3c4b5a69788796a5b4c3d2e1f0").unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = [42u8; KEY_LENGTH];
        let plaintext = b"Hello, World!";

        let ciphertext = encrypt(&key, plaintext).unwrap();
        let decrypted = decrypt(&key, &ciphertext).unwrap();

        assert_eq!(decrypted, plaintext);
        assert_eq!(ciphertext.len(), NONCE_SIZE + plaintext.len() + TAG_SIZE);
    }

    #[test]
    fn test_sealed_roundtrip() {
        let encoded = SealedCodec.encode("secret123", &key()).unwrap();
        assert!(!encoded.contains("secret123"));
        assert_eq!(SealedCodec.try_decode(&encoded, &key()).unwrap(), "secret123");
    }

    #[test]
    fn test_sealed_secret_containing_key() {
        let secret = format!("prefix{}suffix", key().as_str());
        let encoded = SealedCodec.encode(&secret, &key()).unwrap();
        assert_eq!(SealedCodec.decode(&encoded, &key()), secret);
    }

    #[test]
    fn test_sealed_different_nonce_each_time() {
        let ct1 = SealedCodec.encode("same", &key()).unwrap();
        let ct2 = SealedCodec.encode("same", &key()).unwrap();
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn test_sealed_wrong_key_fails() {
        let encoded = SealedCodec.encode("secret", &key()).unwrap();
        let other = EncryptionKey::new("another-key").unwrap();

        assert!(matches!(
            SealedCodec.try_decode(&encoded, &other),
            Err(Error::DecodeFailure(_))
        ));
        assert_eq!(SealedCodec.decode(&encoded, &other), DECRYPTION_FAILED);
    }

    #[test]
    fn test_sealed_tampered_fails() {
        let encoded = SealedCodec.encode("important", &key()).unwrap();
        let mut raw = STANDARD.decode(&encoded).unwrap();
        raw[NONCE_SIZE + 2] ^= 0xFF;
        let tampered = STANDARD.encode(raw);

        assert!(SealedCodec.try_decode(&tampered, &key()).is_err());
    }

    #[test]
    fn test_sealed_short_input_fails() {
        let short = STANDARD.encode([0u8; 8]);
        assert!(SealedCodec.try_decode(&short, &key()).is_err());
    }
}
