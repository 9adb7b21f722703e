//! Vault configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::generator::DEFAULT_PASSWORD_LENGTH;
use passvault_common::{Error, Result};
use passvault_crypto::CodecKind;
use passvault_storage::StoreRegistry;

/// Configuration file name inside the data directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Directory name appended to the platform data directory.
pub const DATA_DIRNAME: &str = "passvault";

/// Default data directory: `<platform data dir>/passvault`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIRNAME)
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend name (e.g., "local", "memory").
    pub provider: String,
    /// Backend-specific options.
    #[serde(default)]
    pub options: serde_json::Value,
}

impl StorageConfig {
    /// File-backed storage rooted at `root`.
    pub fn local(root: impl AsRef<Path>) -> Self {
        Self {
            provider: "local".to_string(),
            options: serde_json::json!({ "root": root.as_ref().to_string_lossy() }),
        }
    }

    /// Ephemeral in-memory storage.
    pub fn memory() -> Self {
        Self {
            provider: "memory".to_string(),
            options: serde_json::Value::Null,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::local(default_data_dir())
    }
}

/// Password generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Length of generated passwords.
    pub length: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_PASSWORD_LENGTH,
        }
    }
}

/// Top-level configuration.
///
/// Every section is optional in the file; missing sections take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Where records are persisted.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Codec used for stored secrets.
    #[serde(default)]
    pub codec: CodecKind,
    /// Password generator settings.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl VaultConfig {
    /// Configuration with file-backed storage under `data_dir`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            storage: StorageConfig::local(data_dir),
            ..Self::default()
        }
    }

    /// Configuration with in-memory storage.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageConfig::memory(),
            ..Self::default()
        }
    }

    /// Check the configuration for values no component accepts.
    pub fn validate(&self) -> Result<()> {
        if self.storage.provider.is_empty() {
            return Err(Error::Validation(
                "Storage provider cannot be empty".to_string(),
            ));
        }
        StoreRegistry::builtin().check(&self.storage.provider)?;
        if self.generator.length == 0 {
            return Err(Error::Validation(
                "Generator length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await? {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let json = tokio::fs::read_to_string(path).await?;
        let config = Self::from_json(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to `path`, creating parent directories.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, self.to_json()?).await?;
        Ok(())
    }
}
