//! End-to-end flows through the credential store against both backends.

use chrono::Utc;
use std::sync::Arc;
use tempfile::TempDir;

use passvault_common::{Error, SlotKey};
use passvault_crypto::LegacyCodec;
use passvault_storage::{FileStore, KeyValueStore, MemoryStore};
use passvault_vault::{CredentialStore, RiskBand, SessionState, VaultConfig};

#[tokio::test]
async fn test_register_login_reveal_scenario() {
    let store = CredentialStore::from_config(&VaultConfig::in_memory()).unwrap();
    store.key_store().ensure_key().await;

    store.register("a@x.com", "Pw1").await.unwrap();
    store.login("a@x.com", "Pw1").await.unwrap();
    assert_eq!(
        store.session_state().await,
        SessionState::LoggedIn("a@x.com".to_string())
    );

    assert!(matches!(
        store.login("a@x.com", "wrong").await,
        Err(Error::WrongPassword)
    ));
    assert!(matches!(
        store.register("a@x.com", "Pw1").await,
        Err(Error::DuplicateUser(_))
    ));

    let entry = store
        .add_entry("a@x.com", "github", "secret123", "")
        .await
        .unwrap();
    assert_ne!(entry.password, "secret123");

    assert_eq!(
        store.reveal_entry("a@x.com", &entry.id, "Pw1").await.unwrap(),
        "secret123"
    );
    assert!(matches!(
        store.reveal_entry("a@x.com", &entry.id, "wrong").await,
        Err(Error::WrongPassword)
    ));

    store.logout().await.unwrap();
    assert_eq!(store.session_state().await, SessionState::LoggedOut);
}

#[tokio::test]
async fn test_add_list_delete_timing() {
    let store = CredentialStore::new(Arc::new(MemoryStore::new()), Arc::new(LegacyCodec));
    store.key_store().ensure_key().await;

    let before = Utc::now();
    let entry = store
        .add_entry("a@x.com", "github", "secret123", "https://github.com")
        .await
        .unwrap();

    let listed = store.list_entries("a@x.com").await.unwrap();
    let found = listed.iter().find(|e| e.id == entry.id).unwrap();
    let drift = (found.last_modified - before).num_milliseconds().abs();
    assert!(drift <= 1000, "lastModified drifted {} ms", drift);
    assert_eq!(found.risk_band(Utc::now()), RiskBand::Fresh);

    store.delete_entry("a@x.com", &entry.id).await.unwrap();
    assert!(store
        .list_entries("a@x.com")
        .await
        .unwrap()
        .iter()
        .all(|e| e.id != entry.id));
}

#[tokio::test]
async fn test_file_backed_store_survives_restart() {
    let temp = TempDir::new().unwrap();
    let config = VaultConfig::with_data_dir(temp.path());

    let entry_id = {
        let store = CredentialStore::from_config(&config).unwrap();
        store.key_store().ensure_key().await;
        store.register("a@x.com", "Pw1").await.unwrap();
        store.login("a@x.com", "Pw1").await.unwrap();
        store
            .add_entry("a@x.com", "github", "secret123", "")
            .await
            .unwrap()
            .id
    };

    let reopened = CredentialStore::from_config(&config).unwrap();
    let key_before = reopened.key_store().get_key().await.unwrap();
    assert!(!reopened.key_store().ensure_key().await);
    let key_after = reopened.key_store().get_key().await.unwrap();
    assert_eq!(key_before.as_str(), key_after.as_str());

    assert_eq!(
        reopened.current_user().await.unwrap().as_deref(),
        Some("a@x.com")
    );
    assert_eq!(
        reopened
            .reveal_entry("a@x.com", &entry_id, "Pw1")
            .await
            .unwrap(),
        "secret123"
    );
}

#[tokio::test]
async fn test_concurrent_logins_on_file_backed_store() {
    let temp = TempDir::new().unwrap();
    let config = VaultConfig::with_data_dir(temp.path());
    let store = Arc::new(CredentialStore::from_config(&config).unwrap());
    store.register("a@x.com", "Pw1").await.unwrap();
    store.register("b@x.com", "Pw2").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                store.login("a@x.com", "Pw1").await
            } else {
                store.login("b@x.com", "Pw2").await
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let current = store.current_user().await.unwrap().unwrap();
    assert!(current == "a@x.com" || current == "b@x.com");

    store.logout().await.unwrap();
    assert_eq!(store.session_state().await, SessionState::LoggedOut);
}

#[tokio::test]
async fn test_reads_existing_collections() {
    let temp = TempDir::new().unwrap();
    let backend = FileStore::new(temp.path()).unwrap();

    // Collections as written by an earlier install: key, one account
    // (password "Pw1" with salt "s"), one entry encoded as base64("secret123" + key).
    backend
        .set(&SlotKey::new("encryptionKey").unwrap(), "k")
        .await
        .unwrap();
    let hash = passvault_crypto::sha256_hex("Pw1s");
    backend
        .set(
            &SlotKey::new("users").unwrap(),
            &format!(
                r#"[{{"email":"a@x.com","hashedPassword":"{}","salt":"s"}}]"#,
                hash
            ),
        )
        .await
        .unwrap();
    backend
        .set(
            &SlotKey::new("passwords").unwrap(),
            r#"{"a@x.com":[{"id":"1700000000000","service":"github","password":"c2VjcmV0MTIzaw==","url":"","lastModified":"2023-11-14T22:13:20.000Z"}]}"#,
        )
        .await
        .unwrap();

    let store = CredentialStore::new(Arc::new(backend), Arc::new(LegacyCodec));
    store.login("a@x.com", "Pw1").await.unwrap();

    let entries = store.list_entries("a@x.com").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].risk_band(Utc::now()), RiskBand::Stale);
    assert_eq!(
        store
            .reveal_entry("a@x.com", "1700000000000", "Pw1")
            .await
            .unwrap(),
        "secret123"
    );
}
