//! Credential vault engine for PassVault.
//!
//! This module provides:
//! - Lifecycle of the process-wide encryption key
//! - User registration, login and the persisted session marker
//! - Vault entries: save, list, reveal with re-authentication, delete
//! - Age and risk-band helpers for presenting entries
//! - Password generation and configuration
//!
//! # Architecture
//! The vault module sits between callers and the key/value store,
//! hashing passwords and encoding secrets before anything is persisted.

pub mod age;
pub mod config;
pub mod generator;
pub mod keystore;
pub mod records;
pub mod session;
pub mod store;

pub use age::{age_in_days, risk_band, RiskBand};
pub use config::{GeneratorConfig, StorageConfig, VaultConfig};
pub use generator::{generate_password, DEFAULT_PASSWORD_LENGTH};
pub use keystore::KeyStore;
pub use records::{EntryMap, UserAccount, VaultEntry};
pub use session::{SessionMarker, SessionState};
pub use store::CredentialStore;
