//! Integration tests for the Fortress vault: key file, credential store
//! and session working together on disk.

use std::fs;
use std::sync::Arc;

use fortress::config::Settings;
use fortress::crypto::FieldCipher;
use fortress::errors::FortressError;
use fortress::vault::{CredentialStore, CredentialSummary, Session, VaultKeyStore};
use tempfile::TempDir;

/// Helper: open a fresh session in a temp data directory.
fn session() -> (TempDir, Session) {
    let dir = TempDir::new().expect("create temp dir");
    let session = Session::open(dir.path(), Settings::default()).expect("open session");
    (dir, session)
}

fn summary(service: &str, login: &str) -> CredentialSummary {
    CredentialSummary {
        service: service.to_string(),
        login: login.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Full lifecycle
// ---------------------------------------------------------------------------

#[test]
fn create_save_reopen_and_delete() {
    let (dir, mut session) = session();
    session.create_vault("secret123").unwrap();

    let id = session
        .save_credential("GitHub", "bob", "p@ss", "work", None)
        .unwrap();
    assert_eq!(id, 1);
    drop(session);

    // A new session over the same directory sees the same data.
    let mut session = Session::open(dir.path(), Settings::default()).unwrap();
    assert!(session.vault_exists());
    assert!(session.unlock_vault("secret123").unwrap());

    let cred = session.get_credential("GitHub").unwrap().unwrap();
    assert_eq!(cred.id, 1);
    assert_eq!(cred.login, "bob");
    assert_eq!(cred.password.as_str(), "p@ss");
    assert_eq!(cred.comment, "work");

    session.delete_credential(1).unwrap();
    assert!(session.get_credential("GitHub").unwrap().is_none());
}

/// The key store and credential store used directly, below the session's
/// master-password policy.
#[test]
fn key_store_and_credential_store_end_to_end() {
    let dir = TempDir::new().unwrap();
    let keys = VaultKeyStore::new(dir.path().join("fortress.kdf"));
    keys.create(b"secret1").unwrap();

    let key = keys.unlock(b"secret1").unwrap();
    let cipher = FieldCipher::new(Arc::new(key));
    let store = CredentialStore::new(dir.path().join("fortress.db"), cipher);
    store.initialize().unwrap();

    let id = store.save("GitHub", "bob", "p@ss", "work", None).unwrap();
    assert_eq!(id, 1);

    let cred = store.get("GitHub").unwrap().unwrap();
    assert_eq!(
        (cred.id, cred.login.as_str(), cred.password.as_str(), cred.comment.as_str()),
        (1, "bob", "p@ss", "work")
    );

    store.delete(1).unwrap();
    assert!(store.get("GitHub").unwrap().is_none());

    assert!(matches!(
        keys.unlock(b"secret2"),
        Err(FortressError::AuthError)
    ));
}

#[test]
fn wrong_password_does_not_unlock() {
    let (dir, mut session) = session();
    session.create_vault("secret123").unwrap();
    drop(session);

    let mut session = Session::open(dir.path(), Settings::default()).unwrap();
    assert!(!session.unlock_vault("secret124").unwrap());
    assert!(!session.is_unlocked());
}

#[test]
fn truncated_key_file_reads_as_wrong_password() {
    let (dir, mut session) = session();
    session.create_vault("secret123").unwrap();
    let key_path = session.key_path().to_path_buf();
    drop(session);

    fs::write(&key_path, [0u8; 10]).unwrap();

    let mut session = Session::open(dir.path(), Settings::default()).unwrap();
    assert!(!session.unlock_vault("secret123").unwrap());
}

#[test]
fn corrupted_key_file_reads_as_wrong_password() {
    let (dir, mut session) = session();
    session.create_vault("secret123").unwrap();
    let key_path = session.key_path().to_path_buf();
    drop(session);

    let mut bytes = fs::read(&key_path).unwrap();
    bytes[20] ^= 0xFF;
    fs::write(&key_path, bytes).unwrap();

    let mut session = Session::open(dir.path(), Settings::default()).unwrap();
    assert!(!session.unlock_vault("secret123").unwrap());
}

#[test]
fn key_file_layout_is_salt_nonce_key_tag() {
    let (_dir, mut session) = session();
    session.create_vault("secret123").unwrap();
    let bytes = fs::read(session.key_path()).unwrap();
    assert_eq!(bytes.len(), 16 + 12 + 32 + 16);
}

#[test]
fn init_twice_is_rejected() {
    let (_dir, mut session) = session();
    session.create_vault("secret123").unwrap();
    assert!(matches!(
        session.create_vault("another-one"),
        Err(FortressError::AlreadyExists(_))
    ));
}

// ---------------------------------------------------------------------------
// Credential behaviour
// ---------------------------------------------------------------------------

#[test]
fn duplicate_service_is_rejected() {
    let (_dir, mut session) = session();
    session.create_vault("secret123").unwrap();
    session.save_credential("GitHub", "bob", "a", "", None).unwrap();

    let err = session
        .save_credential("GitHub", "alice", "b", "", None)
        .unwrap_err();
    assert!(matches!(err, FortressError::DuplicateService(s) if s == "GitHub"));
}

#[test]
fn delete_is_idempotent() {
    let (_dir, mut session) = session();
    session.create_vault("secret123").unwrap();
    let id = session.save_credential("A", "u", "pw", "", None).unwrap();

    session.delete_credential(id).unwrap();
    session.delete_credential(id).unwrap();
    session.delete_credential(999).unwrap();
}

#[test]
fn list_is_sorted_ignoring_case() {
    let (_dir, mut session) = session();
    session.create_vault("secret123").unwrap();
    session.save_credential("banana", "b", "1", "", None).unwrap();
    session.save_credential("Apple", "a", "2", "", None).unwrap();
    session.save_credential("cherry", "c", "3", "", None).unwrap();

    assert_eq!(
        session.list_credentials().unwrap(),
        vec![
            summary("Apple", "a"),
            summary("banana", "b"),
            summary("cherry", "c"),
        ]
    );
}

#[test]
fn update_keeps_id_and_replaces_password() {
    let (_dir, mut session) = session();
    session.create_vault("secret123").unwrap();
    let id = session.save_credential("Mail", "me", "old", "", None).unwrap();

    let same = session
        .save_credential("Mail", "me", "new", "rotated", Some(id))
        .unwrap();
    assert_eq!(same, id);

    let cred = session.get_credential("Mail").unwrap().unwrap();
    assert_eq!(cred.password.as_str(), "new");
    assert_eq!(cred.comment, "rotated");
}

#[test]
fn search_matches_service_or_login() {
    let (_dir, mut session) = session();
    session.create_vault("secret123").unwrap();
    session.save_credential("GitHub", "bob", "1", "", None).unwrap();
    session.save_credential("Mail", "bobby@example.com", "2", "", None).unwrap();
    session.save_credential("Bank", "alice", "3", "", None).unwrap();

    let found = session.search_credentials("BOB").unwrap();
    assert_eq!(
        found,
        vec![summary("GitHub", "bob"), summary("Mail", "bobby@example.com")]
    );
}

#[test]
fn creating_a_new_vault_discards_old_rows() {
    let (dir, mut session) = session();
    session.create_vault("secret123").unwrap();
    session.save_credential("Old", "u", "pw", "", None).unwrap();
    let key_path = session.key_path().to_path_buf();
    drop(session);

    // Lose the key file but keep the database.
    fs::remove_file(&key_path).unwrap();

    let mut session = Session::open(dir.path(), Settings::default()).unwrap();
    assert!(!session.vault_exists());
    session.create_vault("different-pw").unwrap();
    assert!(session.list_credentials().unwrap().is_empty());
}

#[test]
fn custom_file_names_from_settings() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("fortress.toml"),
        "db_filename = \"store.db\"\nkey_filename = \"store.key\"\n",
    )
    .unwrap();

    let settings = Settings::load(dir.path()).unwrap();
    let mut session = Session::open(dir.path(), settings).unwrap();
    session.create_vault("secret123").unwrap();

    assert!(dir.path().join("store.db").exists());
    assert!(dir.path().join("store.key").exists());
    assert!(!dir.path().join("fortress.kdf").exists());
}
