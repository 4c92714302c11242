//! The unlocked-vault session.
//!
//! `Session` is the surface the application calls into.  It owns the
//! key store, the path to the credential database and, once unlocked, the
//! data key.  There is no global state: dropping the session (or
//! calling `lock`) drops the key, which zeroes itself.
//!
//! Every credential operation requires an unlocked session.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use super::credentials::CredentialStore;
use super::keystore::VaultKeyStore;
use super::policy::validate_master_password;
use super::record::{Credential, CredentialSummary};
use crate::config::Settings;
use crate::crypto::{DataKey, FieldCipher};
use crate::errors::{FortressError, Result};

/// One vault, at most one unlocked data key.
pub struct Session {
    key_store: VaultKeyStore,
    db_path: PathBuf,
    settings: Settings,
    store: Option<CredentialStore>,
}

impl Session {
    /// Open a session over the vault in `data_dir`.
    ///
    /// Makes sure the credential table exists (a `StorageInitError`
    /// here means nothing else can work).  The session starts locked.
    pub fn open(data_dir: &Path, settings: Settings) -> Result<Self> {
        let db_path = settings.db_path(data_dir);
        CredentialStore::new(&db_path, FieldCipher::locked()).initialize()?;

        Ok(Self {
            key_store: VaultKeyStore::new(settings.key_path(data_dir)),
            db_path,
            settings,
            store: None,
        })
    }

    /// Returns `true` if a key file is present.
    pub fn vault_exists(&self) -> bool {
        self.key_store.exists()
    }

    /// Returns `true` if a data key is loaded.
    pub fn is_unlocked(&self) -> bool {
        self.store.is_some()
    }

    /// Create a new vault and leave the session unlocked.
    ///
    /// Rejects passwords shorter than the configured minimum.  Any rows
    /// left in the database from an earlier vault are removed, since
    /// they were sealed under a key that no longer exists.
    ///
    /// If those rows cannot be removed the new key file is deleted again
    /// and the session stays locked, so the call can simply be retried.
    pub fn create_vault(&mut self, password: &str) -> Result<()> {
        validate_master_password(password, self.settings.min_master_password_len)?;

        let key = self.key_store.create(password.as_bytes())?;
        let cleared = self.attach(key).clear();
        if let Err(e) = cleared {
            self.lock();
            if let Err(rm) = fs::remove_file(self.key_store.path()) {
                warn!(error = %rm, "could not remove key file after a failed create");
            }
            return Err(e);
        }

        info!("vault created and unlocked");
        Ok(())
    }

    /// Try to unlock the vault.
    ///
    /// `Ok(true)`: unlocked.  `Ok(false)`: wrong password or damaged
    /// key file (deliberately indistinguishable).  `Err`: no vault, or
    /// the key file could not be read.
    pub fn unlock_vault(&mut self, password: &str) -> Result<bool> {
        match self.key_store.unlock(password.as_bytes()) {
            Ok(key) => {
                self.attach(key);
                info!("vault unlocked");
                Ok(true)
            }
            Err(FortressError::AuthError) => {
                self.lock();
                info!("unlock attempt failed");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Drop the data key.
    pub fn lock(&mut self) {
        self.store = None;
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Insert (`id = None`) or update a credential.  Returns its id.
    pub fn save_credential(
        &self,
        service: &str,
        login: &str,
        password: &str,
        comment: &str,
        id: Option<i64>,
    ) -> Result<i64> {
        self.store()?.save(service, login, password, comment, id)
    }

    /// Decrypted credential for `service`, if any.
    pub fn get_credential(&self, service: &str) -> Result<Option<Credential>> {
        self.store()?.get(service)
    }

    /// All services and logins, sorted by service ignoring case.
    pub fn list_credentials(&self) -> Result<Vec<CredentialSummary>> {
        self.store()?.list()
    }

    /// Services and logins containing `query`, ignoring case.
    pub fn search_credentials(&self, query: &str) -> Result<Vec<CredentialSummary>> {
        self.store()?.search(query)
    }

    /// Delete a credential; a missing id is not an error.
    pub fn delete_credential(&self, id: i64) -> Result<()> {
        self.store()?.delete(id)
    }

    /// Id of the credential for `service`, without decrypting anything.
    pub fn credential_id(&self, service: &str) -> Result<Option<i64>> {
        self.store()?.find_id(service)
    }

    /// Exact-match check on the service name.
    pub fn service_exists(&self, service: &str) -> Result<bool> {
        self.store()?.exists(service)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Path to the key-material file.
    pub fn key_path(&self) -> &Path {
        self.key_store.path()
    }

    /// Path to the credential database.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// The settings this session was opened with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn attach(&mut self, key: DataKey) -> &CredentialStore {
        let cipher = FieldCipher::new(Arc::new(key));
        let store = CredentialStore::new(&self.db_path, cipher)
            .with_busy_timeout(self.settings.busy_timeout());
        self.store.insert(store)
    }

    fn store(&self) -> Result<&CredentialStore> {
        self.store.as_ref().ok_or(FortressError::NotUnlocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session() -> (TempDir, Session) {
        let dir = TempDir::new().unwrap();
        let session = Session::open(dir.path(), Settings::default()).unwrap();
        (dir, session)
    }

    #[test]
    fn starts_locked_without_a_vault() {
        let (_dir, session) = session();
        assert!(!session.vault_exists());
        assert!(!session.is_unlocked());
        assert!(session.db_path().exists());
    }

    #[test]
    fn locked_session_exposes_nothing() {
        let (_dir, session) = session();
        assert!(matches!(
            session.list_credentials(),
            Err(FortressError::NotUnlocked)
        ));
        assert!(matches!(
            session.service_exists("x"),
            Err(FortressError::NotUnlocked)
        ));
        assert!(matches!(
            session.delete_credential(1),
            Err(FortressError::NotUnlocked)
        ));
    }

    #[test]
    fn short_master_password_is_rejected() {
        let (_dir, mut session) = session();
        assert!(matches!(
            session.create_vault("short"),
            Err(FortressError::InvalidInput(_))
        ));
        assert!(!session.vault_exists());
    }

    #[test]
    fn lock_drops_access() {
        let (_dir, mut session) = session();
        session.create_vault("long-enough").unwrap();
        session.save_credential("A", "u", "pw", "", None).unwrap();

        session.lock();
        assert!(matches!(
            session.get_credential("A"),
            Err(FortressError::NotUnlocked)
        ));

        assert!(session.unlock_vault("long-enough").unwrap());
        assert!(session.service_exists("A").unwrap());
    }

    #[test]
    fn failed_unlock_relocks_an_open_session() {
        let (_dir, mut session) = session();
        session.create_vault("long-enough").unwrap();
        assert!(!session.unlock_vault("wrong-password").unwrap());
        assert!(!session.is_unlocked());
    }

    #[test]
    fn failed_reset_leaves_no_vault_behind() {
        let (_dir, mut session) = session();

        // Make the reset of old rows fail.
        rusqlite::Connection::open(session.db_path())
            .unwrap()
            .execute_batch("DROP TABLE credentials;")
            .unwrap();

        assert!(matches!(
            session.create_vault("long-enough"),
            Err(FortressError::Storage(_))
        ));
        assert!(!session.is_unlocked());
        assert!(!session.vault_exists());
    }

    #[test]
    fn unlock_without_vault_is_not_found() {
        let (_dir, mut session) = session();
        assert!(matches!(
            session.unlock_vault("whatever1"),
            Err(FortressError::NotFound(_))
        ));
    }
}
