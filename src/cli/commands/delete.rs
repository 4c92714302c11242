//! `fortress delete` — remove a credential.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::errors::{FortressError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, service: &str, force: bool) -> Result<()> {
    let session = unlock_session(cli)?;

    let id = session
        .credential_id(service)?
        .ok_or_else(|| FortressError::ServiceNotFound(service.to_string()))?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete credential '{service}'?"))
            .default(false)
            .interact()
            .map_err(|e| FortressError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    session.delete_credential(id)?;
    output::success(&format!("Deleted '{service}'"));

    Ok(())
}
