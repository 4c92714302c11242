//! `fortress init` — create a new vault with a master password.

use std::fs;

use crate::cli::output;
use crate::cli::{open_session, prompt_new_password, Cli};
use crate::errors::{FortressError, Result};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    // 1. Create the data directory if it doesn't exist.
    if !cli.data_dir.exists() {
        fs::create_dir_all(&cli.data_dir)?;
        output::info(&format!(
            "Created data directory: {}",
            cli.data_dir.display()
        ));
    }

    // 2. Refuse to overwrite an existing vault.
    let mut session = open_session(cli)?;
    if session.vault_exists() {
        output::tip("Use `fortress add` to store credentials in the existing vault.");
        return Err(FortressError::AlreadyExists(session.key_path().to_path_buf()));
    }

    // 3. Prompt for a new master password (with confirmation).
    let min_len = session.settings().min_master_password_len;
    let password = prompt_new_password(min_len)?;

    // 4. Write the key file; the session is now unlocked.
    session.create_vault(&password)?;

    output::success(&format!(
        "Vault created at {}",
        session.key_path().display()
    ));
    output::warning("Remember your master password: it cannot be recovered if lost.");

    output::tip("Run `fortress add <SERVICE> --login <LOGIN>` to store a credential.");
    output::tip("Run `fortress list` to see everything stored.");

    Ok(())
}
