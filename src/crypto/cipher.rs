//! Per-field authenticated encryption for credential passwords.
//!
//! `FieldCipher` is the only thing that ever touches the data key.
//! The credential store holds one as an opaque capability: it can ask
//! for a value to be encrypted or decrypted, never for the key itself.

use std::sync::Arc;

use zeroize::{Zeroize, Zeroizing};

use super::encryption::{decrypt, encrypt};
use super::keys::DataKey;
use crate::errors::{FortressError, Result};

/// Encrypts and decrypts individual password fields.
///
/// Cheap to clone: clones share the same read-only key.
#[derive(Clone)]
pub struct FieldCipher {
    key: Option<Arc<DataKey>>,
}

impl FieldCipher {
    /// A cipher backed by an unlocked data key.
    pub fn new(key: Arc<DataKey>) -> Self {
        Self { key: Some(key) }
    }

    /// A cipher with no key; every operation fails with `NotUnlocked`.
    pub fn locked() -> Self {
        Self { key: None }
    }

    /// Returns `true` if a data key is loaded.
    pub fn is_unlocked(&self) -> bool {
        self.key.is_some()
    }

    /// Encrypt a password value with a fresh nonce.
    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>> {
        let key = self.key()?;
        encrypt(key.as_bytes(), plaintext.as_bytes())
    }

    /// Authenticate and decrypt a stored password value.
    ///
    /// Never returns unauthenticated or partially decrypted text.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<String>> {
        let key = self.key()?;
        let plaintext = decrypt(key.as_bytes(), ciphertext)?;

        // On error, wipe the bytes inside the error before discarding.
        String::from_utf8(plaintext).map(Zeroizing::new).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            FortressError::EncodingError
        })
    }

    fn key(&self) -> Result<&DataKey> {
        self.key.as_deref().ok_or(FortressError::NotUnlocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> FieldCipher {
        FieldCipher::new(Arc::new(DataKey::generate()))
    }

    #[test]
    fn roundtrip_preserves_text() {
        let c = cipher();
        let long = "x".repeat(4096);
        for text in ["", "p@ss", "with\0nul", "пароль 🔐 密码", long.as_str()] {
            let ct = c.encrypt(text).unwrap();
            assert_eq!(c.decrypt(&ct).unwrap().as_str(), text);
        }
    }

    #[test]
    fn every_call_uses_a_fresh_nonce() {
        let c = cipher();
        let a = c.encrypt("same").unwrap();
        let b = c.encrypt("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn any_flipped_byte_is_rejected() {
        let c = cipher();
        let ct = c.encrypt("hunter2").unwrap();
        for i in 0..ct.len() {
            let mut tampered = ct.clone();
            tampered[i] ^= 0x01;
            assert!(
                matches!(c.decrypt(&tampered), Err(FortressError::DecryptError)),
                "byte {i} flip was not detected"
            );
        }
    }

    #[test]
    fn wrong_key_is_rejected() {
        let ct = cipher().encrypt("secret").unwrap();
        assert!(matches!(
            cipher().decrypt(&ct),
            Err(FortressError::DecryptError)
        ));
    }

    #[test]
    fn malformed_input_is_rejected() {
        let c = cipher();
        assert!(matches!(c.decrypt(&[]), Err(FortressError::DecryptError)));
        assert!(matches!(
            c.decrypt(&[0u8; 20]),
            Err(FortressError::DecryptError)
        ));
    }

    #[test]
    fn invalid_utf8_is_an_encoding_error() {
        let key = Arc::new(DataKey::generate());
        let ct = encrypt(key.as_bytes(), &[0xff, 0xfe, 0xfd]).unwrap();
        let c = FieldCipher::new(key);
        assert!(matches!(c.decrypt(&ct), Err(FortressError::EncodingError)));
    }

    #[test]
    fn locked_cipher_refuses_to_work() {
        let c = FieldCipher::locked();
        assert!(!c.is_unlocked());
        assert!(matches!(c.encrypt("x"), Err(FortressError::NotUnlocked)));
        assert!(matches!(c.decrypt(&[0u8; 40]), Err(FortressError::NotUnlocked)));
    }
}
