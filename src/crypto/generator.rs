//! Random password generation.

use rand::Rng;

use crate::errors::{FortressError, Result};

/// ASCII letters, digits and punctuation.
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz\
ABCDEFGHIJKLMNOPQRSTUVWXYZ\
0123456789\
!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Upper bound on generated length.
const MAX_LEN: usize = 1024;

/// Generate a random password of `len` characters.
///
/// Each character is drawn uniformly from `CHARSET` using the
/// thread-local CSPRNG.
pub fn generate_password(len: usize) -> Result<String> {
    if len == 0 || len > MAX_LEN {
        return Err(FortressError::InvalidInput(format!(
            "password length must be between 1 and {MAX_LEN} (got {len})"
        )));
    }

    let mut rng = rand::rng();
    let password = (0..len)
        .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
        .collect();
    Ok(password)
}
