//! Terminal output for the CLI.
//!
//! Status lines carry a colored marker.  Successes, info and tips go to
//! stdout; warnings and errors go to stderr so piped output stays clean.

use std::fmt::Display;

use comfy_table::{ContentArrangement, Table};
use console::{style, StyledObject};

use crate::vault::{Credential, CredentialSummary};

fn mark(symbol: &'static str) -> StyledObject<&'static str> {
    style(symbol).bold()
}

/// `✓ msg` in green.
pub fn success(msg: impl Display) {
    println!("{} {msg}", mark("\u{2713}").green());
}

/// `✗ msg` in red, on stderr.
pub fn error(msg: impl Display) {
    eprintln!("{} {msg}", mark("\u{2717}").red());
}

/// `⚠ msg` in yellow, on stderr.
pub fn warning(msg: impl Display) {
    eprintln!("{} {msg}", mark("\u{26a0}").yellow());
}

/// `ℹ msg` in blue.
pub fn info(msg: impl Display) {
    println!("{} {msg}", mark("\u{2139}").blue());
}

/// A dimmed hint about what to run next.
pub fn tip(msg: impl Display) {
    println!("{}", style(format!("\u{2192} {msg}")).dim());
}

fn table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Services and logins, one row each.  Passwords never appear here.
pub fn print_credentials_table(credentials: &[CredentialSummary]) {
    if credentials.is_empty() {
        info("Nothing found.");
        tip("Run `fortress add <SERVICE> --login <LOGIN>` to store a credential.");
        return;
    }

    let mut table = table();
    table.set_header(["Service", "Login"]);
    for c in credentials {
        table.add_row([c.service.as_str(), c.login.as_str()]);
    }
    println!("{table}");
}

/// One credential as a two-column card.  The password is masked unless
/// `reveal` is set; an empty comment is left out.
pub fn print_credential(credential: &Credential, reveal: bool) {
    let password = if reveal {
        credential.password.as_str()
    } else {
        "********"
    };

    let mut table = table();
    table
        .add_row(["Service", credential.service.as_str()])
        .add_row(["Login", credential.login.as_str()])
        .add_row(["Password", password]);
    if !credential.comment.is_empty() {
        table.add_row(["Comment", credential.comment.as_str()]);
    }
    println!("{table}");
}
