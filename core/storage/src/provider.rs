//! Key/value store trait definition.

use async_trait::async_trait;

use passvault_common::{Result, SlotKey};

/// Persistent store of string values addressed by slot name.
///
/// Implementations must convert backend failures into
/// `Error::StorageUnavailable` so callers see one error shape regardless
/// of where data lives.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the backend name (e.g., "memory", "local").
    fn name(&self) -> &str;

    /// Read a slot.
    ///
    /// # Postconditions
    /// - Returns `None` if the slot has never been written or was deleted
    async fn get(&self, slot: &SlotKey) -> Result<Option<String>>;

    /// Write a slot, replacing any previous value.
    ///
    /// # Postconditions
    /// - A subsequent `get` returns `value`
    async fn set(&self, slot: &SlotKey, value: &str) -> Result<()>;

    /// Remove a slot.
    ///
    /// Deleting a slot that does not exist succeeds.
    async fn delete(&self, slot: &SlotKey) -> Result<()>;
}
