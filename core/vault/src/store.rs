//! Credential store: accounts, session and vault entries.
//!
//! Collections are persisted whole. Every mutation reads the full
//! collection, changes it in memory and writes it back; the write lock
//! serializes those sequences within the process. Nothing coordinates
//! separate processes sharing the same backend, where the last writer
//! wins.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::VaultConfig;
use crate::keystore::KeyStore;
use crate::records::{
    next_entry_id, slot, EntryMap, UserAccount, VaultEntry, SLOT_PASSWORDS, SLOT_USERS,
};
use crate::session::{SessionMarker, SessionState};
use passvault_common::{Error, Result};
use passvault_crypto::{PasswordHasher, SecretCodec};
use passvault_storage::{KeyValueStore, StoreRegistry};

fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Owner of the persisted user, entry and session collections.
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    keys: KeyStore,
    session: SessionMarker,
    codec: Arc<dyn SecretCodec>,
    write_lock: Mutex<()>,
}

impl CredentialStore {
    /// Create a credential store over a backend with the given codec.
    pub fn new(store: Arc<dyn KeyValueStore>, codec: Arc<dyn SecretCodec>) -> Self {
        Self {
            keys: KeyStore::new(store.clone()),
            session: SessionMarker::new(store.clone()),
            store,
            codec,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a credential store from configuration.
    ///
    /// # Errors
    /// - Unknown storage backend or invalid backend options
    pub fn from_config(config: &VaultConfig) -> Result<Self> {
        config.validate()?;
        let store = StoreRegistry::builtin().open(&config.storage.provider, &config.storage.options)?;
        Ok(Self::new(store, config.codec.build()))
    }

    /// Get the key store sharing this backend.
    pub fn key_store(&self) -> &KeyStore {
        &self.keys
    }

    /// Get the codec used for stored secrets.
    pub fn codec(&self) -> &dyn SecretCodec {
        self.codec.as_ref()
    }

    async fn load_users(&self) -> Result<Vec<UserAccount>> {
        match self.store.get(&slot(SLOT_USERS)?).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save_users(&self, users: &[UserAccount]) -> Result<()> {
        let json = serde_json::to_string(users)?;
        self.store.set(&slot(SLOT_USERS)?, &json).await
    }

    async fn load_entries(&self) -> Result<EntryMap> {
        match self.store.get(&slot(SLOT_PASSWORDS)?).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(EntryMap::new()),
        }
    }

    async fn save_entries(&self, entries: &EntryMap) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.store.set(&slot(SLOT_PASSWORDS)?, &json).await
    }

    async fn find_user(&self, email: &str) -> Result<UserAccount> {
        self.load_users()
            .await?
            .into_iter()
            .find(|user| user.email == email)
            .ok_or_else(|| Error::UserNotFound(email.to_string()))
    }

    /// Check `password` against the stored hash for `email`.
    async fn authenticate(&self, email: &str, password: &str) -> Result<UserAccount> {
        let user = self.find_user(email).await?;
        if !PasswordHasher::verify(password, &user.salt, &user.hashed_password) {
            warn!(email = %email, "Password verification failed");
            return Err(Error::WrongPassword);
        }
        Ok(user)
    }

    /// Register a new account.
    ///
    /// # Postconditions
    /// - The account is appended to the persisted users with a fresh salt
    ///
    /// # Errors
    /// - `Validation` if email or password is empty
    /// - `DuplicateUser` if the email is already registered (exact match)
    pub async fn register(&self, email: &str, password: &str) -> Result<()> {
        require("Email", email)?;
        require("Password", password)?;

        let _guard = self.write_lock.lock().await;

        let mut users = self.load_users().await?;
        if users.iter().any(|user| user.email == email) {
            return Err(Error::DuplicateUser(email.to_string()));
        }

        let salt = PasswordHasher::make_salt();
        let hashed_password = PasswordHasher::hash(password, &salt);
        users.push(UserAccount {
            email: email.to_string(),
            hashed_password,
            salt,
        });
        self.save_users(&users).await?;

        info!(email = %email, "User registered");
        Ok(())
    }

    /// Register a new account after checking the confirmation entry.
    ///
    /// # Errors
    /// - `Validation` if any field is empty or the passwords differ
    /// - `DuplicateUser` as for [`CredentialStore::register`]
    pub async fn register_confirmed(
        &self,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<()> {
        require("Email", email)?;
        require("Password", password)?;
        require("Password confirmation", confirmation)?;
        if password != confirmation {
            return Err(Error::Validation("Passwords do not match".to_string()));
        }
        self.register(email, password).await
    }

    /// Log in and set the session marker.
    ///
    /// # Errors
    /// - `Validation` if email or password is empty
    /// - `UserNotFound` if no account has this email
    /// - `WrongPassword` if the password does not verify
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        require("Email", email)?;
        require("Password", password)?;

        self.authenticate(email, password).await?;

        let _guard = self.write_lock.lock().await;
        self.session.set(email).await?;

        info!(email = %email, "User logged in");
        Ok(())
    }

    /// Clear the session marker unconditionally.
    pub async fn logout(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.session.clear().await?;
        info!("User logged out");
        Ok(())
    }

    /// Email of the logged-in account, if any.
    pub async fn current_user(&self) -> Result<Option<String>> {
        self.session.current().await
    }

    /// Current session state.
    ///
    /// A marker that cannot be read counts as logged out.
    pub async fn session_state(&self) -> SessionState {
        match self.session.state().await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Session marker unreadable, treating as logged out");
                SessionState::LoggedOut
            }
        }
    }

    /// Encode and save a new entry for `owner`.
    ///
    /// # Postconditions
    /// - The entry is appended to the owner's entries and the whole
    ///   collection is persisted
    /// - `last_modified` is the time of this call
    ///
    /// # Errors
    /// - `Validation` if owner, service or password is empty
    /// - `KeyMissing` if no encryption key is provisioned
    pub async fn add_entry(
        &self,
        owner: &str,
        service: &str,
        plaintext_password: &str,
        url: &str,
    ) -> Result<VaultEntry> {
        require("Owner", owner)?;
        require("Service", service)?;
        require("Password", plaintext_password)?;

        debug!(service = %service, "Adding vault entry");

        let key = self.keys.get_key().await.ok_or(Error::KeyMissing)?;
        let ciphertext = self.codec.encode(plaintext_password, &key)?;

        let _guard = self.write_lock.lock().await;

        let mut entries = self.load_entries().await?;
        let partition = entries.entry(owner.to_string()).or_default();

        let now = Utc::now();
        let entry = VaultEntry {
            id: next_entry_id(partition, now),
            service: service.to_string(),
            password: ciphertext,
            url: url.to_string(),
            last_modified: now,
        };
        partition.push(entry.clone());
        self.save_entries(&entries).await?;

        info!(id = %entry.id, service = %service, "Vault entry added");
        Ok(entry)
    }

    /// Re-authenticate `owner` and return the plaintext of one entry.
    ///
    /// Every reveal re-checks the login password; there is no unlock
    /// token.
    ///
    /// # Errors
    /// - `UserNotFound` if the owner has no account
    /// - `WrongPassword` if `reauth_password` does not verify
    /// - `EntryNotFound` if the owner has no entry with this id
    /// - `KeyMissing` if no encryption key is provisioned
    /// - `DecodeFailure` if the stored secret cannot be recovered
    pub async fn reveal_entry(
        &self,
        owner: &str,
        entry_id: &str,
        reauth_password: &str,
    ) -> Result<String> {
        debug!(id = %entry_id, "Revealing vault entry");

        self.authenticate(owner, reauth_password).await?;

        let ciphertext = self
            .load_entries()
            .await?
            .remove(owner)
            .unwrap_or_default()
            .into_iter()
            .find(|entry| entry.id == entry_id)
            .map(|entry| entry.password)
            .ok_or_else(|| Error::EntryNotFound(entry_id.to_string()))?;

        let key = self.keys.get_key().await.ok_or(Error::KeyMissing)?;

        self.codec.try_decode(&ciphertext, &key).map_err(|e| {
            warn!(
                id = %entry_id,
                codec = self.codec.name(),
                error = %e,
                "Stored secret could not be decoded"
            );
            e
        })
    }

    /// Delete one of `owner`'s entries.
    ///
    /// Deleting an id that does not exist succeeds without writing.
    pub async fn delete_entry(&self, owner: &str, entry_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load_entries().await?;
        let Some(partition) = entries.get_mut(owner) else {
            debug!(id = %entry_id, "No entries for owner, nothing to delete");
            return Ok(());
        };

        let before = partition.len();
        partition.retain(|entry| entry.id != entry_id);
        if partition.len() == before {
            debug!(id = %entry_id, "Entry not found, nothing to delete");
            return Ok(());
        }

        self.save_entries(&entries).await?;

        info!(id = %entry_id, "Vault entry deleted");
        Ok(())
    }

    /// List `owner`'s entries in insertion order.
    pub async fn list_entries(&self, owner: &str) -> Result<Vec<VaultEntry>> {
        Ok(self
            .load_entries()
            .await?
            .remove(owner)
            .unwrap_or_default())
    }
}
