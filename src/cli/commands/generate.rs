//! `fortress generate` — print a random password.  No vault needed.

use crate::cli::Cli;
use crate::config::Settings;
use crate::crypto::generate_password;
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(cli: &Cli, length: Option<usize>) -> Result<()> {
    let length = match length {
        Some(n) => n,
        None => Settings::load(&cli.data_dir)?.generated_password_len,
    };
    println!("{}", generate_password(length)?);
    Ok(())
}
