//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - SHA-256 hex digests and random tokens
//! - The process-wide encryption key type with automatic zeroization
//! - Salted password hashing and verification
//! - Secret codecs that turn a plaintext secret and the key into a
//!   storable string and back
//!
//! # Security Guarantees
//! - Key material is zeroized on drop
//! - No plaintext, password or key material is ever logged
//! - Hash verification uses constant-time comparison

pub mod aead;
pub mod codec;
pub mod digest;
pub mod hasher;
pub mod keys;

pub use aead::SealedCodec;
pub use codec::{CodecKind, LegacyCodec, SecretCodec, DECRYPTION_FAILED};
pub use digest::{random_token, sha256_hex};
pub use hasher::PasswordHasher;
pub use keys::EncryptionKey;
