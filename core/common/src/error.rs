//! Common error types for PassVault.

use thiserror::Error;

/// Top-level error type for PassVault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An account with this email is already registered.
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    /// No account matches the given email.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The supplied password does not match the stored hash.
    #[error("Incorrect password")]
    WrongPassword,

    /// The encryption key has not been provisioned.
    #[error("Encryption key not found")]
    KeyMissing,

    /// A stored secret could not be recovered.
    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    /// No vault entry matches the given id.
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// The underlying key/value store failed.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Cryptographic operation failed.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the failure can be corrected by the user and retried.
    ///
    /// Authentication and domain failures are recoverable; storage,
    /// serialization and crypto failures point at the environment or at
    /// corrupted data.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::DuplicateUser(_)
                | Error::UserNotFound(_)
                | Error::WrongPassword
                | Error::KeyMissing
                | Error::EntryNotFound(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
