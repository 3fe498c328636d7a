use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::ports::{Mailer, PasswordMail};

/// Fallback when no mail gateway is configured: records the send, never the password.
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password(&self, mail: &PasswordMail) -> Result<(), DomainError> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            username = %mail.username,
            "mail gateway not configured; password mail not delivered"
        );
        Ok(())
    }
}
