//! Cryptographic primitives for Fortress.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 master-key derivation (`kdf`)
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - The zeroizing data-encryption key (`keys`)
//! - Per-field password encryption bound to an unlocked key (`cipher`)
//! - Random password generation (`generator`)

pub mod cipher;
pub mod encryption;
pub mod generator;
pub mod kdf;
pub mod keys;

pub use cipher::FieldCipher;
pub use encryption::{decrypt, encrypt};
pub use generator::generate_password;
pub use kdf::{derive_master_key, generate_salt, KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};
pub use keys::DataKey;
