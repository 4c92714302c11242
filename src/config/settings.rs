use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{FortressError, Result};
use crate::vault::MIN_MASTER_PASSWORD_LEN;

/// Vault-level configuration, loaded from `<data_dir>/fortress.toml`.
///
/// Every field has a sensible default so Fortress works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Credential database file name inside the data directory.
    #[serde(default = "default_db_filename")]
    pub db_filename: String,

    /// Key-material file name inside the data directory.
    #[serde(default = "default_key_filename")]
    pub key_filename: String,

    /// Minimum master-password length, in characters (default: 8).
    #[serde(default = "default_min_master_password_len")]
    pub min_master_password_len: usize,

    /// Length of passwords produced by the generator (default: 16).
    #[serde(default = "default_generated_password_len")]
    pub generated_password_len: usize,

    /// How long a writer waits on a locked database, in ms (default: 5000).
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_db_filename() -> String {
    "fortress.db".to_string()
}

fn default_key_filename() -> String {
    "fortress.kdf".to_string()
}

fn default_min_master_password_len() -> usize {
    MIN_MASTER_PASSWORD_LEN
}

fn default_generated_password_len() -> usize {
    16
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_filename: default_db_filename(),
            key_filename: default_key_filename(),
            min_master_password_len: default_min_master_password_len(),
            generated_password_len: default_generated_password_len(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the data directory.
    const FILE_NAME: &'static str = "fortress.toml";

    /// Load settings from `<data_dir>/fortress.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            FortressError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would make the vault unusable or weaker than
    /// the built-in policy.
    fn validate(&self) -> Result<()> {
        if self.db_filename.is_empty() || self.key_filename.is_empty() {
            return Err(FortressError::ConfigError(
                "db_filename and key_filename cannot be empty".into(),
            ));
        }
        if self.db_filename == self.key_filename {
            return Err(FortressError::ConfigError(
                "db_filename and key_filename must differ".into(),
            ));
        }
        if self.min_master_password_len < MIN_MASTER_PASSWORD_LEN {
            return Err(FortressError::ConfigError(format!(
                "min_master_password_len cannot be below {MIN_MASTER_PASSWORD_LEN}"
            )));
        }
        if self.generated_password_len == 0 {
            return Err(FortressError::ConfigError(
                "generated_password_len must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Full path to the credential database.
    ///
    /// Example: `data/fortress.db`
    pub fn db_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.db_filename)
    }

    /// Full path to the key-material file.
    ///
    /// Example: `data/fortress.kdf`
    pub fn key_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.key_filename)
    }

    /// Busy timeout as a `Duration`.
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
