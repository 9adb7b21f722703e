//! Persisted session marker.
//!
//! The marker records which account is logged in on this device. Its
//! absence means nobody is logged in.

use std::sync::Arc;
use tracing::debug;

use crate::records::{slot, SLOT_CURRENT_USER};
use passvault_common::Result;
use passvault_storage::KeyValueStore;

/// State of the device session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No account is logged in.
    LoggedOut,
    /// The account with this email is logged in.
    LoggedIn(String),
}

impl SessionState {
    /// Check if an account is logged in.
    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn(_))
    }

    /// Email of the logged-in account, if any.
    pub fn user(&self) -> Option<&str> {
        match self {
            SessionState::LoggedIn(email) => Some(email),
            SessionState::LoggedOut => None,
        }
    }
}

/// Reader and writer for the `currentUser` slot.
#[derive(Clone)]
pub struct SessionMarker {
    store: Arc<dyn KeyValueStore>,
}

impl SessionMarker {
    /// Create a marker over a key/value backend.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Email of the logged-in account, if any.
    pub async fn current(&self) -> Result<Option<String>> {
        let value = self.store.get(&slot(SLOT_CURRENT_USER)?).await?;
        Ok(value.filter(|email| !email.is_empty()))
    }

    /// Current session state.
    pub async fn state(&self) -> Result<SessionState> {
        Ok(match self.current().await? {
            Some(email) => SessionState::LoggedIn(email),
            None => SessionState::LoggedOut,
        })
    }

    /// Mark `email` as logged in.
    pub async fn set(&self, email: &str) -> Result<()> {
        self.store.set(&slot(SLOT_CURRENT_USER)?, email).await?;
        debug!("Session marker set");
        Ok(())
    }

    /// Clear the marker.
    pub async fn clear(&self) -> Result<()> {
        self.store.delete(&slot(SLOT_CURRENT_USER)?).await?;
        debug!("Session marker cleared");
        Ok(())
    }
}
