//! `fortress edit` — update an existing credential in place.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{read_credential_password, unlock_session, Cli};
use crate::crypto::generate_password;
use crate::errors::{FortressError, Result};

/// Field changes requested on the command line.
pub struct EditArgs<'a> {
    pub rename: Option<&'a str>,
    pub login: Option<&'a str>,
    pub comment: Option<&'a str>,
    pub new_password: bool,
    pub generate: bool,
}

impl EditArgs<'_> {
    fn is_empty(&self) -> bool {
        self.rename.is_none()
            && self.login.is_none()
            && self.comment.is_none()
            && !self.new_password
            && !self.generate
    }
}

/// Execute the `edit` command.
pub fn execute(cli: &Cli, service: &str, args: &EditArgs<'_>) -> Result<()> {
    if args.is_empty() {
        return Err(FortressError::InvalidInput(
            "nothing to change — pass --rename, --login, --comment, --new-password or --generate"
                .into(),
        ));
    }

    let session = unlock_session(cli)?;

    let current = session
        .get_credential(service)?
        .ok_or_else(|| FortressError::ServiceNotFound(service.to_string()))?;

    let password = if args.generate {
        Zeroizing::new(generate_password(session.settings().generated_password_len)?)
    } else if args.new_password {
        read_credential_password(args.rename.unwrap_or(service))?
    } else {
        current.password.clone()
    };

    let new_service = args.rename.unwrap_or(current.service.as_str());
    let login = args.login.unwrap_or(current.login.as_str());
    let comment = args.comment.unwrap_or(current.comment.as_str());

    session.save_credential(new_service, login, &password, comment, Some(current.id))?;

    if new_service == service {
        output::success(&format!("Updated '{service}'"));
    } else {
        output::success(&format!("Updated '{service}' (now '{new_service}')"));
    }

    Ok(())
}
