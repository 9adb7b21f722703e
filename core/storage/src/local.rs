//! Local filesystem key/value store.

use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::debug;

use crate::provider::KeyValueStore;
use passvault_common::{Error, Result, SlotKey};

/// Local filesystem key/value store.
///
/// Each slot is a file named after the slot inside the root directory.
/// Every write goes to its own uniquely named temporary file in the root
/// that is renamed into place, so a reader never observes a partially
/// written value and concurrent writers of one slot do not collide.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new file store with the given root directory.
    ///
    /// # Postconditions
    /// - Root directory is created if it doesn't exist
    ///
    /// # Errors
    /// - Permission denied or invalid path
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        // Create root if it doesn't exist (sync for constructor)
        if !root.exists() {
            std::fs::create_dir_all(&root).map_err(|e| {
                Error::StorageUnavailable(format!(
                    "Cannot create store directory {}: {}",
                    root.display(),
                    e
                ))
            })?;
        }

        Ok(Self { root })
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, slot: &SlotKey) -> PathBuf {
        self.root.join(slot.as_str())
    }
}

fn unavailable(action: &str, slot: &SlotKey, err: std::io::Error) -> Error {
    Error::StorageUnavailable(format!("Failed to {} slot '{}': {}", action, slot, err))
}

#[cfg(unix)]
fn restrict_permissions(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}

/// Write `bytes` to a fresh temp file in `root` and rename it over `target`.
fn write_replace(root: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut temp = NamedTempFile::new_in(root)?;
    restrict_permissions(temp.as_file())?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn get(&self, slot: &SlotKey) -> Result<Option<String>> {
        match fs::read_to_string(self.slot_path(slot)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(unavailable("read", slot, e)),
        }
    }

    async fn set(&self, slot: &SlotKey, value: &str) -> Result<()> {
        let root = self.root.clone();
        let target = self.slot_path(slot);
        let bytes = value.as_bytes().to_vec();

        tokio::task::spawn_blocking(move || write_replace(&root, &target, &bytes))
            .await
            .map_err(|e| {
                Error::StorageUnavailable(format!("Write of slot '{}' aborted: {}", slot, e))
            })?
            .map_err(|e| unavailable("write", slot, e))?;

        debug!(slot = %slot, bytes = value.len(), "Slot written");
        Ok(())
    }

    async fn delete(&self, slot: &SlotKey) -> Result<()> {
        match fs::remove_file(self.slot_path(slot)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(unavailable("delete", slot, e)),
        }
    }
}
