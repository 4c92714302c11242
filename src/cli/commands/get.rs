//! `fortress get` — show a credential, or copy its password.

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::errors::{FortressError, Result};

/// Execute the `get` command.
pub fn execute(cli: &Cli, service: &str, copy: bool) -> Result<()> {
    let session = unlock_session(cli)?;

    let credential = session
        .get_credential(service)?
        .ok_or_else(|| FortressError::ServiceNotFound(service.to_string()))?;

    if copy {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| FortressError::CommandFailed(format!("clipboard unavailable: {e}")))?;
        clipboard
            .set_text(credential.password.as_str())
            .map_err(|e| FortressError::CommandFailed(format!("clipboard write failed: {e}")))?;

        output::print_credential(&credential, false);
        output::success("Password copied to clipboard.");
    } else {
        output::print_credential(&credential, true);
    }

    Ok(())
}
