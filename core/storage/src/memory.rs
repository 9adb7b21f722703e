//! In-memory key/value store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::provider::KeyValueStore;
use passvault_common::{Result, SlotKey};

/// In-memory key/value store.
///
/// Useful for testing and development. All data is stored in memory
/// and lost on drop. Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, slot: &SlotKey) -> Result<Option<String>> {
        Ok(self.slots.read().await.get(slot.as_str()).cloned())
    }

    async fn set(&self, slot: &SlotKey, value: &str) -> Result<()> {
        self.slots
            .write()
            .await
            .insert(slot.as_str().to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, slot: &SlotKey) -> Result<()> {
        self.slots.write().await.remove(slot.as_str());
        Ok(())
    }
}
