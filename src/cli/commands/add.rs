//! `fortress add` — store a new credential.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{read_credential_password, unlock_session, Cli};
use crate::crypto::generate_password;
use crate::errors::{FortressError, Result};

/// Execute the `add` command.
pub fn execute(cli: &Cli, service: &str, login: &str, comment: &str, generate: bool) -> Result<()> {
    let session = unlock_session(cli)?;

    // Check first so the user isn't asked for a password for nothing.
    // The store's UNIQUE constraint still has the final word.
    if session.service_exists(service)? {
        output::tip(&format!("Use `fortress edit {service}` to change it."));
        return Err(FortressError::DuplicateService(service.to_string()));
    }

    let password = if generate {
        Zeroizing::new(generate_password(session.settings().generated_password_len)?)
    } else {
        read_credential_password(service)?
    };

    let id = session.save_credential(service, login, &password, comment, None)?;

    output::success(&format!("Saved '{service}' (#{id})"));
    if generate {
        output::info(&format!(
            "Generated a {}-character password.",
            password.chars().count()
        ));
        output::tip(&format!("Run `fortress get {service} --copy` to use it."));
    }

    Ok(())
}
