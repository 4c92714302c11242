//! The key-material file.
//!
//! One file per vault, no header and no version byte:
//!
//! ```text
//! [salt: 16 bytes][nonce: 12 bytes][wrapped data key: 32 bytes][GCM tag: 16 bytes]
//! ```
//!
//! The salt feeds PBKDF2 to rebuild the master key; everything after it
//! is the data-encryption key sealed with AES-256-GCM under that master
//! key.  The master password itself is never stored.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};
use zeroize::Zeroize;

use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::kdf::{derive_master_key, generate_salt, SALT_LEN};
use crate::crypto::keys::DataKey;
use crate::errors::{FortressError, Result};

/// Owns the on-disk key-material file for one vault.
#[derive(Debug, Clone)]
pub struct VaultKeyStore {
    path: PathBuf,
}

impl VaultKeyStore {
    /// Point at a key file; nothing is read or written yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the key file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a vault has been created at this path.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create a new vault protected by `password`.
    ///
    /// Generates a fresh salt and a fresh data key, wraps the data key
    /// under the password-derived master key and writes the file
    /// atomically.  Returns the (already unlocked) data key.
    ///
    /// Exactly one of several concurrent creators succeeds; the rest get
    /// `AlreadyExists` and the file is never overwritten.
    pub fn create(&self, password: &[u8]) -> Result<DataKey> {
        if self.exists() {
            return Err(FortressError::AlreadyExists(self.path.clone()));
        }

        let salt = generate_salt();
        let master_key = derive_master_key(password, &salt);

        let data_key = DataKey::generate();
        let wrapped = encrypt(&master_key, data_key.as_bytes())?;

        let mut buf = Vec::with_capacity(SALT_LEN + wrapped.len());
        buf.extend_from_slice(&salt);
        buf.extend_from_slice(&wrapped);

        write_new(&self.path, &buf)?;
        info!(path = %self.path.display(), "vault key file created");

        Ok(data_key)
    }

    /// Unlock the vault and return its data key.
    ///
    /// Every failure past "the file exists and is readable" collapses
    /// into `AuthError`: callers cannot tell a wrong password from a
    /// truncated or corrupted file.
    pub fn unlock(&self, password: &[u8]) -> Result<DataKey> {
        if !self.exists() {
            return Err(FortressError::NotFound(self.path.clone()));
        }

        let data = fs::read(&self.path)?;

        if data.len() < SALT_LEN {
            debug!(len = data.len(), "key file shorter than its salt");
            return Err(FortressError::AuthError);
        }

        let (salt_bytes, wrapped) = data.split_at(SALT_LEN);
        let salt: [u8; SALT_LEN] = salt_bytes.try_into().map_err(|_| FortressError::AuthError)?;
        let master_key = derive_master_key(password, &salt);

        let mut raw_key = match decrypt(&master_key, wrapped) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(error = %e, "data key did not unwrap");
                return Err(FortressError::AuthError);
            }
        };

        let key = DataKey::from_slice(&raw_key);
        raw_key.zeroize();

        key.ok_or_else(|| {
            debug!("unwrapped data key has the wrong length");
            FortressError::AuthError
        })
    }
}

/// Publish `bytes` at `path`, never replacing a file that is already there.
///
/// The bytes go to a uniquely named temp file in the same directory,
/// are flushed to disk, and are then linked into place without
/// clobbering.  If another creator got there first the result is
/// `AlreadyExists`.  On any failure the temp file is removed and `path`
/// is left untouched.
fn write_new(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    restrict_permissions(tmp.path())?;
    tmp.as_file().sync_all()?;

    tmp.persist_noclobber(path).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            FortressError::AlreadyExists(path.to_path_buf())
        } else {
            FortressError::Io(e.error)
        }
    })?;
    Ok(())
}

/// Owner-only read/write on Unix.
fn restrict_permissions(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
