//! Common utilities and types shared across PassVault modules.
//!
//! This module provides the error taxonomy used by every layer and the
//! validated slot key type used to address the persistent key/value store.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::SlotKey;
