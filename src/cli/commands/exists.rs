//! `fortress exists` — report whether a service is stored.

use crate::cli::{unlock_session, Cli};
use crate::errors::Result;

/// Execute the `exists` command.  Prints `yes` or `no`.
pub fn execute(cli: &Cli, service: &str) -> Result<()> {
    let session = unlock_session(cli)?;
    let answer = if session.service_exists(service)? {
        "yes"
    } else {
        "no"
    };
    println!("{answer}");
    Ok(())
}
