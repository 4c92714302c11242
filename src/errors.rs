use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in Fortress.
#[derive(Debug, Error)]
pub enum FortressError {
    // --- Vault unlock errors ---
    #[error("Authentication failed — wrong master password or corrupted key file")]
    AuthError,

    #[error("No vault found at {0}")]
    NotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Vault is locked — unlock it before touching credentials")]
    NotUnlocked,

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — stored data was tampered with or belongs to another vault")]
    DecryptError,

    #[error("Decrypted value is not valid UTF-8 text")]
    EncodingError,

    // --- Credential store errors ---
    #[error("Service '{0}' already exists")]
    DuplicateService(String),

    #[error("No credential stored for service '{0}'")]
    ServiceNotFound(String),

    #[error("Credential #{0} not found")]
    CredentialNotFound(i64),

    #[error("Credential storage cannot be initialized: {0}")]
    StorageInitError(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // --- Input errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for Fortress results.
pub type Result<T> = std::result::Result<T, FortressError>;
