//! Common types used throughout PassVault.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a slot in the persistent key/value store.
///
/// Slot names are non-empty and limited to ASCII alphanumerics, `.`, `-`
/// and `_`, which keeps them valid as file names for file-backed stores
/// and as keys for platform secure stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey(String);

impl SlotKey {
    /// Create a new SlotKey from a string.
    ///
    /// # Errors
    /// - Returns error if the name is empty or contains a disallowed character
    pub fn new(name: impl Into<String>) -> crate::Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(crate::Error::Validation(
                "Slot key cannot be empty".to_string(),
            ));
        }
        if let Some(c) = name.chars().find(|c| !Self::is_allowed(*c)) {
            return Err(crate::Error::Validation(format!(
                "Slot key contains invalid character {:?}",
                c
            )));
        }
        Ok(Self(name))
    }

    fn is_allowed(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
