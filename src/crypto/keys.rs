//! The data-encryption key.
//!
//! Generated once when a vault is created, wrapped under the master
//! key on disk, and reconstructed in memory on every unlock.

use rand::RngCore;
use zeroize::Zeroize;

use super::kdf::KEY_LEN;

/// A 32-byte data-encryption key that zeroes its memory when dropped.
///
/// Deliberately not `Clone` or `Debug`: share it through an `Arc` and
/// never print it.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct DataKey {
    bytes: [u8; KEY_LEN],
}

impl DataKey {
    /// Generate a fresh random key from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Rebuild a key from unwrapped bytes.
    ///
    /// Returns `None` unless the slice is exactly `KEY_LEN` bytes.
    pub fn from_slice(raw: &[u8]) -> Option<Self> {
        let bytes: [u8; KEY_LEN] = raw.try_into().ok()?;
        Some(Self { bytes })
    }

    /// Access the raw key bytes.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}
