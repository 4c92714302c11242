//! Credential types returned by the store.

use serde::Serialize;
use zeroize::Zeroizing;

/// A fully decrypted credential record.
///
/// The password is held in `Zeroizing` so it is wiped when the record
/// is dropped.
pub struct Credential {
    pub id: i64,
    pub service: String,
    pub login: String,
    pub password: Zeroizing<String>,
    pub comment: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("service", &self.service)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("comment", &self.comment)
            .finish()
    }
}

/// Service + login pair for the summary view (no password).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialSummary {
    pub service: String,
    pub login: String,
}
