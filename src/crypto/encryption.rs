//! AES-256-GCM sealing for short byte strings.
//!
//! Sealed layout, used both for the wrapped data key in the key file
//! and for every stored credential password:
//!
//! ```text
//! [nonce: 12 bytes][ciphertext: len(plaintext)][tag: 16 bytes]
//! ```
//!
//! A fresh random nonce is drawn for every call to `encrypt`.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use super::kdf::KEY_LEN;
use crate::errors::{FortressError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Seal `plaintext` under `key`, returning `nonce || ciphertext || tag`.
pub fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let sealed = Aes256Gcm::new(key.into())
        .encrypt(&nonce, plaintext)
        .map_err(|e| FortressError::EncryptionFailed(e.to_string()))?;

    Ok([nonce.as_slice(), sealed.as_slice()].concat())
}

/// Open a buffer produced by `encrypt`.
///
/// Anything that fails to authenticate (short input, wrong key, a
/// flipped bit anywhere in nonce, body or tag) is a `DecryptError`.
pub fn decrypt(key: &[u8; KEY_LEN], sealed: &[u8]) -> Result<Vec<u8>> {
    if sealed.len() < NONCE_LEN + TAG_LEN {
        return Err(FortressError::DecryptError);
    }

    let (nonce, body) = sealed.split_at(NONCE_LEN);
    Aes256Gcm::new(key.into())
        .decrypt(Nonce::from_slice(nonce), body)
        .map_err(|_| FortressError::DecryptError)
}
