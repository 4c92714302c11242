//! `fortress list` — show services and logins, optionally filtered.

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::errors::{FortressError, Result};

/// Execute the `list` command.
pub fn execute(cli: &Cli, search: Option<&str>, json: bool) -> Result<()> {
    let session = unlock_session(cli)?;

    let credentials = match search {
        Some(query) => session.search_credentials(query)?,
        None => session.list_credentials()?,
    };

    if json {
        let out = serde_json::to_string_pretty(&credentials)
            .map_err(|e| FortressError::SerializationError(e.to_string()))?;
        println!("{out}");
        return Ok(());
    }

    output::info(&format!("{} credential(s)", credentials.len()));
    output::print_credentials_table(&credentials);

    Ok(())
}
