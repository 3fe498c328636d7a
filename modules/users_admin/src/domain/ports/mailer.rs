use std::fmt;

use async_trait::async_trait;

use crate::domain::error::DomainError;

/// Mail telling a new user their generated credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordMail {
    pub to: String,
    pub subject: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
}

impl fmt::Debug for PasswordMail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordMail")
            .field("to", &self.to)
            .field("subject", &self.subject)
            .field("username", &self.username)
            .field("full_name", &self.full_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Transport-agnostic outgoing mail port.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password(&self, mail: &PasswordMail) -> Result<(), DomainError>;
}
