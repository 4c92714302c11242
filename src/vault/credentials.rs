//! SQLite-backed credential table.
//!
//! Every password passes through the `FieldCipher` at the boundary:
//! encrypted immediately before it is written, decrypted immediately
//! after it is read.  Service, login and comment are plaintext.
//!
//! There is no long-lived connection.  Each operation opens its own
//! connection, runs in its own transaction, and releases both when it
//! returns, on success and error paths alike (a dropped `Transaction`
//! rolls back).  SQLite serializes concurrent writers; the busy
//! timeout makes them wait instead of failing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use tracing::{debug, info};

use super::policy::validate_credential_input;
use super::record::{Credential, CredentialSummary};
use crate::crypto::FieldCipher;
use crate::errors::{FortressError, Result};

/// Default time a writer waits for a competing lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable table of credential records.
#[derive(Clone)]
pub struct CredentialStore {
    db_path: PathBuf,
    cipher: FieldCipher,
    busy_timeout: Duration,
}

impl CredentialStore {
    /// Build a store over the database at `db_path`.
    ///
    /// Call `initialize` once before any other operation.
    pub fn new(db_path: impl Into<PathBuf>, cipher: FieldCipher) -> Self {
        Self {
            db_path: db_path.into(),
            cipher,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Override how long a writer waits for a competing lock.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Path to the database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // ------------------------------------------------------------------
    // Schema
    // ------------------------------------------------------------------

    /// Create the `credentials` table if needed and bring it up to date.
    ///
    /// Idempotent.  A table from an older release without the `comment`
    /// column gets it added in place, existing rows untouched.  Any
    /// failure here is fatal: `StorageInitError`.
    pub fn initialize(&self) -> Result<()> {
        let init_err = |e: rusqlite::Error| FortressError::StorageInitError(e.to_string());

        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| FortressError::StorageInitError(e.to_string()))?;
            }
        }

        let mut conn = self.open().map_err(init_err)?;

        // WAL lets readers proceed while a writer commits.  The pragma
        // returns the resulting mode as a row.
        let mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(init_err)?;
        debug!(%mode, "journal mode");

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(init_err)?;

        tx.execute_batch(
            "CREATE TABLE IF NOT EXISTS credentials (
                id                 INTEGER PRIMARY KEY AUTOINCREMENT,
                service            TEXT NOT NULL UNIQUE,
                login              TEXT NOT NULL,
                encrypted_password BLOB NOT NULL,
                comment            TEXT
            );",
        )
        .map_err(init_err)?;

        let columns: Vec<String> = {
            let mut stmt = tx
                .prepare("PRAGMA table_info(credentials)")
                .map_err(init_err)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(1))
                .map_err(init_err)?;
            rows.collect::<rusqlite::Result<_>>().map_err(init_err)?
        };

        if !columns.iter().any(|c| c == "comment") {
            info!("adding missing comment column to credentials table");
            tx.execute_batch("ALTER TABLE credentials ADD COLUMN comment TEXT;")
                .map_err(init_err)?;
        }

        tx.commit().map_err(init_err)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Insert a new credential, or update `existing_id` in place.
    ///
    /// The password is encrypted with a fresh nonce on every call; an
    /// update replaces the old ciphertext.  Returns the record's id.
    ///
    /// Fails with `DuplicateService` if another record already uses
    /// `service`, and with `CredentialNotFound` if `existing_id` does
    /// not exist.
    pub fn save(
        &self,
        service: &str,
        login: &str,
        password: &str,
        comment: &str,
        existing_id: Option<i64>,
    ) -> Result<i64> {
        validate_credential_input(service, login, password)?;
        let encrypted = self.cipher.encrypt(password)?;

        let mut conn = self.open().map_err(storage_err)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(storage_err)?;

        let id = match existing_id {
            Some(id) => {
                let changed = tx
                    .execute(
                        "UPDATE credentials
                         SET service = ?1, login = ?2, encrypted_password = ?3, comment = ?4
                         WHERE id = ?5",
                        params![service, login, encrypted, comment, id],
                    )
                    .map_err(|e| write_err(e, service))?;
                if changed == 0 {
                    return Err(FortressError::CredentialNotFound(id));
                }
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO credentials (service, login, encrypted_password, comment)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![service, login, encrypted, comment],
                )
                .map_err(|e| write_err(e, service))?;
                tx.last_insert_rowid()
            }
        };

        tx.commit().map_err(storage_err)?;
        debug!(id, "credential saved");
        Ok(id)
    }

    /// Remove a credential.  Deleting an id that does not exist is a no-op.
    pub fn delete(&self, id: i64) -> Result<()> {
        let mut conn = self.open().map_err(storage_err)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(storage_err)?;
        let removed = tx
            .execute("DELETE FROM credentials WHERE id = ?1", params![id])
            .map_err(storage_err)?;
        tx.commit().map_err(storage_err)?;
        debug!(id, removed, "credential delete");
        Ok(())
    }

    /// Delete every record.  Used when a fresh vault replaces an old one:
    /// rows sealed under the previous data key would be unreadable.
    pub fn clear(&self) -> Result<()> {
        let mut conn = self.open().map_err(storage_err)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(storage_err)?;
        let removed = tx
            .execute("DELETE FROM credentials", [])
            .map_err(storage_err)?;
        tx.commit().map_err(storage_err)?;
        if removed > 0 {
            info!(removed, "cleared credentials left from a previous vault");
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Look up a credential by exact service name and decrypt it.
    ///
    /// A stored password that fails authentication is an error, never
    /// an empty or garbled value.
    pub fn get(&self, service: &str) -> Result<Option<Credential>> {
        let conn = self.open().map_err(storage_err)?;
        let row = conn
            .query_row(
                "SELECT id, login, encrypted_password, comment
                 FROM credentials WHERE service = ?1",
                params![service],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Vec<u8>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(storage_err)?;
        drop(conn);

        let Some((id, login, encrypted, comment)) = row else {
            return Ok(None);
        };

        let password = self.cipher.decrypt(&encrypted)?;

        Ok(Some(Credential {
            id,
            service: service.to_string(),
            login,
            password,
            comment: comment.unwrap_or_default(),
        }))
    }

    /// All services and logins, sorted by service case-insensitively.
    /// Passwords are not touched.
    pub fn list(&self) -> Result<Vec<CredentialSummary>> {
        let conn = self.open().map_err(storage_err)?;
        let mut stmt = conn
            .prepare(
                "SELECT service, login FROM credentials
                 ORDER BY service COLLATE NOCASE ASC, service ASC",
            )
            .map_err(storage_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(CredentialSummary {
                    service: row.get(0)?,
                    login: row.get(1)?,
                })
            })
            .map_err(storage_err)?;

        let mut list = Vec::new();
        for row in rows {
            list.push(row.map_err(storage_err)?);
        }
        Ok(list)
    }

    /// `list()` filtered to entries whose service or login contains
    /// `query`, ignoring case.  A blank query matches everything.
    pub fn search(&self, query: &str) -> Result<Vec<CredentialSummary>> {
        let needle = query.trim().to_lowercase();
        let mut list = self.list()?;
        if !needle.is_empty() {
            list.retain(|c| {
                c.service.to_lowercase().contains(&needle)
                    || c.login.to_lowercase().contains(&needle)
            });
        }
        Ok(list)
    }

    /// Id of the record for `service`; the password is not decrypted.
    pub fn find_id(&self, service: &str) -> Result<Option<i64>> {
        let conn = self.open().map_err(storage_err)?;
        conn.query_row(
            "SELECT id FROM credentials WHERE service = ?1",
            params![service],
            |row| row.get(0),
        )
        .optional()
        .map_err(storage_err)
    }

    /// Exact-match existence check on the service name.
    pub fn exists(&self, service: &str) -> Result<bool> {
        let conn = self.open().map_err(storage_err)?;
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM credentials WHERE service = ?1)",
            params![service],
            |row| row.get(0),
        )
        .map_err(storage_err)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn open(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }
}

fn storage_err(e: rusqlite::Error) -> FortressError {
    FortressError::Storage(e.to_string())
}

/// Map a failed write, turning the UNIQUE(service) violation into
/// `DuplicateService`.
fn write_err(e: rusqlite::Error, service: &str) -> FortressError {
    match e {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            FortressError::DuplicateService(service.to_string())
        }
        other => storage_err(other),
    }
}
