//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{FortressError, Result};
use crate::vault::{validate_master_password, Session};

/// Environment variable read before prompting for the master password.
pub const PASSWORD_ENV: &str = "FORTRESS_PASSWORD";

/// Fortress CLI: local password vault.
#[derive(Parser)]
#[command(
    name = "fortress",
    about = "Local password vault protected by a single master password",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the key file, database and fortress.toml
    #[arg(long, env = "FORTRESS_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault with a master password
    Init,

    /// Add a credential
    Add {
        /// Service name (e.g. GitHub)
        service: String,
        /// Login or user name
        #[arg(short, long)]
        login: String,
        /// Free-form comment
        #[arg(short, long, default_value = "")]
        comment: String,
        /// Generate a random password instead of prompting
        #[arg(short, long)]
        generate: bool,
    },

    /// Change an existing credential
    Edit {
        /// Current service name
        service: String,
        /// Rename the service
        #[arg(long)]
        rename: Option<String>,
        /// New login
        #[arg(short, long)]
        login: Option<String>,
        /// New comment (pass "" to clear)
        #[arg(short, long)]
        comment: Option<String>,
        /// Prompt for a new password
        #[arg(short = 'p', long, conflicts_with = "generate")]
        new_password: bool,
        /// Replace the password with a generated one
        #[arg(short, long)]
        generate: bool,
    },

    /// Show a credential
    Get {
        /// Service name (exact match)
        service: String,
        /// Copy the password to the clipboard instead of printing it
        #[arg(long)]
        copy: bool,
    },

    /// List all services and logins
    List {
        /// Only show entries whose service or login contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete a credential
    Delete {
        /// Service name (exact match)
        service: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Check whether a service is stored
    Exists {
        /// Service name (exact match)
        service: String,
    },

    /// Print a random password
    Generate {
        /// Number of characters (default from fortress.toml, else 16)
        #[arg(short = 'n', long)]
        length: Option<usize>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings and open a (locked) session over the data directory.
pub fn open_session(cli: &Cli) -> Result<Session> {
    let settings = Settings::load(&cli.data_dir)?;
    Session::open(&cli.data_dir, settings)
}

/// Open a session and unlock it with the master password.
///
/// A wrong password and a damaged key file both surface as `AuthError`.
pub fn unlock_session(cli: &Cli) -> Result<Session> {
    let mut session = open_session(cli)?;
    if !session.vault_exists() {
        output::tip("Run `fortress init` to create a vault.");
        return Err(FortressError::NotFound(session.key_path().to_path_buf()));
    }

    let password = prompt_password()?;
    if session.unlock_vault(&password)? {
        Ok(session)
    } else {
        Err(FortressError::AuthError)
    }
}

/// Get the master password, trying in order:
/// 1. `FORTRESS_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Master password")
        .interact()
        .map_err(|e| FortressError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used by `init`).
///
/// Also respects `FORTRESS_PASSWORD`.  Enforces the minimum length.
pub fn prompt_new_password(min_len: usize) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        validate_master_password(&pw, min_len)?;
        return Ok(pw);
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose master password")
                .with_confirmation(
                    "Confirm master password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| FortressError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if validate_master_password(&password, min_len).is_err() {
            output::warning(&format!(
                "Password must be at least {min_len} characters. Try again."
            ));
            continue;
        }

        return Ok(password);
    }
}

/// Read a credential password from piped stdin or a hidden prompt.
pub fn read_credential_password(service: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string());
        return Ok(trimmed);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Password for {service}"))
        .with_confirmation("Confirm password", "Passwords do not match, try again")
        .interact()
        .map_err(|e| FortressError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

fn password_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_options() {
        let cli = Cli::parse_from([
            "fortress", "--data-dir", "/tmp/v", "add", "GitHub", "-l", "bob", "-c", "work", "-g",
        ]);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/v"));
        match cli.command {
            Commands::Add {
                service,
                login,
                comment,
                generate,
            } => {
                assert_eq!(service, "GitHub");
                assert_eq!(login, "bob");
                assert_eq!(comment, "work");
                assert!(generate);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn completions_accepts_known_shells_only() {
        assert!(Cli::try_parse_from(["fortress", "completions", "zsh"]).is_ok());
        assert!(Cli::try_parse_from(["fortress", "completions", "csh"]).is_err());
    }

    #[test]
    fn edit_rejects_prompt_and_generate_together() {
        let result = Cli::try_parse_from(["fortress", "edit", "GitHub", "-p", "-g"]);
        assert!(result.is_err());
    }
}
