//! Vault module — key material and encrypted credential storage.
//!
//! This module provides:
//! - The key-material file: create and unlock (`keystore`)
//! - The SQLite credential table (`credentials`)
//! - Credential record types (`record`)
//! - Input rules for passwords and credential fields (`policy`)
//! - The `Session` that ties them together (`session`)

pub mod credentials;
pub mod keystore;
pub mod policy;
pub mod record;
pub mod session;

pub use credentials::CredentialStore;
pub use keystore::VaultKeyStore;
pub use policy::{validate_credential_input, validate_master_password, MIN_MASTER_PASSWORD_LEN};
pub use record::{Credential, CredentialSummary};
pub use session::Session;
