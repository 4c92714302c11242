//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The master password is stretched into a 32-byte key that is only
//! ever used to wrap and unwrap the data-encryption key.  The iteration
//! count is a constant: the key file has no header, so every vault on
//! disk must be opened with exactly the same cost.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count used for every vault.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte master key from a password and salt.
///
/// Deterministic: the same password + salt always yields the same key.
/// The result is wrapped in `Zeroizing` so it is wiped on drop.
pub fn derive_master_key(password: &[u8], salt: &[u8; SALT_LEN]) -> Zeroizing<[u8; KEY_LEN]> {
    derive_key_with_iterations(password, salt, PBKDF2_ITERATIONS)
}

/// Derive a 32-byte key with an explicit iteration count.
///
/// Vaults always go through `derive_master_key`; this exists so the
/// PBKDF2 construction itself can be checked against known vectors.
pub fn derive_key_with_iterations(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password, salt, iterations, key.as_mut_slice());
    key
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
