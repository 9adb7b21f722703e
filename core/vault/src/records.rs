//! Persisted record model and slot names.
//!
//! Field names are serialized in camelCase (`hashedPassword`,
//! `lastModified`) so existing collections keep loading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use passvault_common::{Result, SlotKey};

/// Slot holding the process-wide encryption key.
pub const SLOT_ENCRYPTION_KEY: &str = "encryptionKey";

/// Slot holding the JSON array of registered accounts.
pub const SLOT_USERS: &str = "users";

/// Slot holding the email of the logged-in user.
pub const SLOT_CURRENT_USER: &str = "currentUser";

/// Slot holding the JSON object of vault entries keyed by owner email.
pub const SLOT_PASSWORDS: &str = "passwords";

/// Build the slot key for one of the fixed slot names.
pub(crate) fn slot(name: &str) -> Result<SlotKey> {
    SlotKey::new(name)
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Unique, case-sensitive email.
    pub email: String,
    /// Hex digest of `password + salt`.
    pub hashed_password: String,
    /// Per-account salt.
    pub salt: String,
}

/// A stored service credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultEntry {
    /// Time-derived identifier, unique within the owner's entries.
    pub id: String,
    /// Service name.
    pub service: String,
    /// Encoded secret; never the plaintext.
    pub password: String,
    /// Service URL, empty when not given.
    #[serde(default)]
    pub url: String,
    /// Creation time. Entries are never edited, so this is not updated.
    pub last_modified: DateTime<Utc>,
}

/// Vault entries partitioned by owner email, in insertion order per owner.
pub type EntryMap = BTreeMap<String, Vec<VaultEntry>>;

/// Pick an id for a new entry.
///
/// The id is the creation time in milliseconds, bumped forward when it
/// collides with an existing entry of the same owner.
pub(crate) fn next_entry_id(existing: &[VaultEntry], now: DateTime<Utc>) -> String {
    let mut candidate = now.timestamp_millis();
    loop {
        let id = candidate.to_string();
        if !existing.iter().any(|entry| entry.id == id) {
            return id;
        }
        candidate += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> VaultEntry {
        VaultEntry {
            id: id.to_string(),
            service: "github".to_string(),
            password: "c2VjcmV0".to_string(),
            url: String::new(),
            last_modified: Utc::now(),
        }
    }

    #[test]
    fn test_user_account_json_shape() {
        let account = UserAccount {
            email: "a@x.com".to_string(),
            hashed_password: "abc".to_string(),
            salt: "def".to_string(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "a@x.com", "hashedPassword": "abc", "salt": "def"})
        );
    }

    #[test]
    fn test_vault_entry_reads_iso_timestamp() {
        let json = r#"{
            "id": "1717171717171",
            "service": "github",
            "password": "c2VjcmV0",
            "url": "",
            "lastModified": "2024-05-31T16:08:37.171Z"
        }"#;
        let entry: VaultEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "1717171717171");
        assert_eq!(entry.last_modified.timestamp_millis(), 1717171717171);
    }

    #[test]
    fn test_vault_entry_missing_url() {
        let json = r#"{"id":"1","service":"s","password":"p","lastModified":"2024-01-01T00:00:00Z"}"#;
        let entry: VaultEntry = serde_json::from_str(json).unwrap();
        assert!(entry.url.is_empty());
    }

    #[test]
    fn test_next_entry_id_uses_millis() {
        let now = Utc::now();
        assert_eq!(next_entry_id(&[], now), now.timestamp_millis().to_string());
    }

    #[test]
    fn test_next_entry_id_avoids_collision() {
        let now = Utc::now();
        let millis = now.timestamp_millis();
        let existing = vec![entry(&millis.to_string()), entry(&(millis + 1).to_string())];
        assert_eq!(next_entry_id(&existing, now), (millis + 2).to_string());
    }

    #[test]
    fn test_fixed_slots_are_valid() {
        for name in [SLOT_ENCRYPTION_KEY, SLOT_USERS, SLOT_CURRENT_USER, SLOT_PASSWORDS] {
            assert!(slot(name).is_ok());
        }
    }
}
