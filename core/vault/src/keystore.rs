//! Lifecycle of the process-wide encryption key.
//!
//! One key exists per installation. It is created the first time
//! [`KeyStore::ensure_key`] runs against an empty store and is never
//! rotated or deleted afterwards. Storage failures are logged and reported
//! as an absent key; they never reach the caller as errors.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::records::{slot, SLOT_ENCRYPTION_KEY};
use passvault_common::Result;
use passvault_crypto::EncryptionKey;
use passvault_storage::KeyValueStore;

/// Service owning the encryption key slot.
pub struct KeyStore {
    store: Arc<dyn KeyValueStore>,
    provision_lock: Mutex<()>,
}

impl KeyStore {
    /// Create a key store over a key/value backend.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            provision_lock: Mutex::new(()),
        }
    }

    /// Make sure a key is persisted, creating one if the slot is empty.
    ///
    /// Idempotent: an existing key is never altered. Safe to call on every
    /// start.
    ///
    /// # Postconditions
    /// - Returns `true` only when this call created the key
    /// - On storage failure the error is logged and `false` is returned
    pub async fn ensure_key(&self) -> bool {
        let _guard = self.provision_lock.lock().await;
        match self.provision().await {
            Ok(created) => created,
            Err(e) => {
                error!(error = %e, "Failed to provision encryption key");
                false
            }
        }
    }

    async fn provision(&self) -> Result<bool> {
        let key_slot = slot(SLOT_ENCRYPTION_KEY)?;

        let existing = self.store.get(&key_slot).await?;
        if existing.is_some_and(|value| !value.is_empty()) {
            debug!("Encryption key already present");
            return Ok(false);
        }

        let key = EncryptionKey::generate();
        self.store.set(&key_slot, key.as_str()).await?;

        info!(store = self.store.name(), "Encryption key created");
        Ok(true)
    }

    /// Get the persisted key.
    ///
    /// Never generates a key. Returns `None` when no key has been
    /// provisioned or when the store cannot be read.
    pub async fn get_key(&self) -> Option<EncryptionKey> {
        match self.load().await {
            Ok(key) => key,
            Err(e) => {
                error!(error = %e, "Failed to read encryption key");
                None
            }
        }
    }

    async fn load(&self) -> Result<Option<EncryptionKey>> {
        let key_slot = slot(SLOT_ENCRYPTION_KEY)?;
        match self.store.get(&key_slot).await? {
            Some(value) if !value.is_empty() => Ok(Some(EncryptionKey::new(value)?)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use passvault_common::{Error, SlotKey};
    use passvault_storage::MemoryStore;

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }

        async fn get(&self, _slot: &SlotKey) -> Result<Option<String>> {
            Err(Error::StorageUnavailable("offline".to_string()))
        }

        async fn set(&self, _slot: &SlotKey, _value: &str) -> Result<()> {
            Err(Error::StorageUnavailable("offline".to_string()))
        }

        async fn delete(&self, _slot: &SlotKey) -> Result<()> {
            Err(Error::StorageUnavailable("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_get_key_absent_before_ensure() {
        let keys = KeyStore::new(Arc::new(MemoryStore::new()));
        assert!(keys.get_key().await.is_none());
    }

    #[tokio::test]
    async fn test_ensure_key_creates_once() {
        let keys = KeyStore::new(Arc::new(MemoryStore::new()));

        assert!(keys.ensure_key().await);
        let first = keys.get_key().await.unwrap();

        assert!(!keys.ensure_key().await);
        let second = keys.get_key().await.unwrap();

        assert_eq!(first.as_str(), second.as_str());
    }

    #[tokio::test]
    async fn test_ensure_key_keeps_existing_value() {
        let store = MemoryStore::new();
        store
            .set(&SlotKey::new(SLOT_ENCRYPTION_KEY).unwrap(), "preexisting")
            .await
            .unwrap();

        let keys = KeyStore::new(Arc::new(store));
        assert!(!keys.ensure_key().await);
        assert_eq!(keys.get_key().await.unwrap().as_str(), "preexisting");
    }

    #[tokio::test]
    async fn test_empty_slot_treated_as_absent() {
        let store = MemoryStore::new();
        store
            .set(&SlotKey::new(SLOT_ENCRYPTION_KEY).unwrap(), "")
            .await
            .unwrap();

        let keys = KeyStore::new(Arc::new(store));
        assert!(keys.get_key().await.is_none());
        assert!(keys.ensure_key().await);
        assert!(keys.get_key().await.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_ensure_creates_single_key() {
        let keys = Arc::new(KeyStore::new(Arc::new(MemoryStore::new())));

        let a = tokio::spawn({
            let keys = keys.clone();
            async move { keys.ensure_key().await }
        });
        let b = tokio::spawn({
            let keys = keys.clone();
            async move { keys.ensure_key().await }
        });

        let created = [a.await.unwrap(), b.await.unwrap()];
        assert_eq!(created.iter().filter(|c| **c).count(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_is_absent_not_error() {
        let keys = KeyStore::new(Arc::new(BrokenStore));
        assert!(!keys.ensure_key().await);
        assert!(keys.get_key().await.is_none());
    }
}
