//! Backend selection by configured name.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::local::FileStore;
use crate::memory::MemoryStore;
use crate::provider::KeyValueStore;
use passvault_common::{Error, Result};

/// Opens a backend from its JSON options.
pub type StoreFactory = fn(&Value) -> Result<Arc<dyn KeyValueStore>>;

/// Table of the storage backends a vault can be configured with.
pub struct StoreRegistry {
    backends: BTreeMap<&'static str, StoreFactory>,
}

impl StoreRegistry {
    /// Registry holding the built-in "memory" and "local" backends.
    pub fn builtin() -> Self {
        let mut backends: BTreeMap<&'static str, StoreFactory> = BTreeMap::new();
        backends.insert("memory", open_memory);
        backends.insert("local", open_local);
        Self { backends }
    }

    /// Backend names, sorted.
    pub fn backends(&self) -> Vec<&'static str> {
        self.backends.keys().copied().collect()
    }

    /// Check that `name` refers to a known backend.
    ///
    /// # Errors
    /// - `Validation` naming the available backends
    pub fn check(&self, name: &str) -> Result<()> {
        if self.backends.contains_key(name) {
            Ok(())
        } else {
            Err(self.unknown(name))
        }
    }

    /// Open the backend `name` with `options`.
    ///
    /// # Errors
    /// - `Validation` for an unknown name or missing options
    /// - `StorageUnavailable` if the backend cannot be opened
    pub fn open(&self, name: &str, options: &Value) -> Result<Arc<dyn KeyValueStore>> {
        match self.backends.get(name) {
            Some(factory) => factory(options),
            None => Err(self.unknown(name)),
        }
    }

    fn unknown(&self, name: &str) -> Error {
        Error::Validation(format!(
            "Unknown storage backend '{}' (available: {})",
            name,
            self.backends().join(", ")
        ))
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn open_memory(_options: &Value) -> Result<Arc<dyn KeyValueStore>> {
    Ok(Arc::new(MemoryStore::new()))
}

fn open_local(options: &Value) -> Result<Arc<dyn KeyValueStore>> {
    let root = options
        .get("root")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Validation("Local store requires a 'root' path".to_string()))?;
    Ok(Arc::new(FileStore::new(root)?))
}
