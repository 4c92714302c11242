//! Input rules shared by the store and the shell.

use crate::errors::{FortressError, Result};

/// Minimum master-password length, in characters.
pub const MIN_MASTER_PASSWORD_LEN: usize = 8;

/// Maximum length of a service name or login, in characters.
pub const MAX_FIELD_LEN: usize = 100;

/// Check a new master password against the minimum length.
pub fn validate_master_password(password: &str, min_len: usize) -> Result<()> {
    if password.chars().count() < min_len {
        return Err(FortressError::InvalidInput(format!(
            "master password must be at least {min_len} characters"
        )));
    }
    Ok(())
}

/// Check the fields of a credential before it is written.
///
/// Service, login and password are required; service and login are
/// capped at `MAX_FIELD_LEN` characters.
pub fn validate_credential_input(service: &str, login: &str, password: &str) -> Result<()> {
    if service.is_empty() || login.is_empty() || password.is_empty() {
        return Err(FortressError::InvalidInput(
            "service, login and password are all required".into(),
        ));
    }
    if service.chars().count() > MAX_FIELD_LEN {
        return Err(FortressError::InvalidInput(format!(
            "service name cannot exceed {MAX_FIELD_LEN} characters"
        )));
    }
    if login.chars().count() > MAX_FIELD_LEN {
        return Err(FortressError::InvalidInput(format!(
            "login cannot exceed {MAX_FIELD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_password_length_counts_characters() {
        assert!(validate_master_password("12345678", 8).is_ok());
        assert!(validate_master_password("1234567", 8).is_err());
        // 8 Cyrillic letters are 16 bytes but still 8 characters.
        assert!(validate_master_password("пароль12", 8).is_ok());
        assert!(validate_master_password("", 8).is_err());
    }

    #[test]
    fn credential_fields_are_required() {
        assert!(validate_credential_input("GitHub", "bob", "p@ss").is_ok());
        assert!(validate_credential_input("", "bob", "p@ss").is_err());
        assert!(validate_credential_input("GitHub", "", "p@ss").is_err());
        assert!(validate_credential_input("GitHub", "bob", "").is_err());
    }

    #[test]
    fn long_service_or_login_is_rejected() {
        let long = "a".repeat(MAX_FIELD_LEN + 1);
        let max = "a".repeat(MAX_FIELD_LEN);
        assert!(validate_credential_input(&max, &max, "pw").is_ok());
        assert!(validate_credential_input(&long, "bob", "pw").is_err());
        assert!(validate_credential_input("GitHub", &long, "pw").is_err());
    }
}
