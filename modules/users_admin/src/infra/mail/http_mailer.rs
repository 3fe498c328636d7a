use adminkit::TracedClient;
use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;
use url::Url;

use crate::domain::error::DomainError;
use crate::domain::ports::{Mailer, PasswordMail};

const PASSWORD_TEMPLATE: &str = "password";

#[derive(Serialize)]
struct MailRequest<'a> {
    to: &'a str,
    subject: &'a str,
    template: &'static str,
    data: PasswordData<'a>,
}

#[derive(Serialize)]
struct PasswordData<'a> {
    username: &'a str,
    full_name: &'a str,
    password: &'a str,
}

/// Mailer that hands templated mails to an HTTP mail gateway
/// (`POST {base}/api/mail`).
pub struct HttpMailer {
    client: TracedClient,
    base: Url,
}

impl HttpMailer {
    pub fn new(client: TracedClient, base: Url) -> Self {
        Self { client, base }
    }

    fn endpoint(&self) -> Result<Url, DomainError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::mailer("invalid mail gateway base URL"))?
            .pop_if_empty()
            .extend(&["api", "mail"]);
        Ok(url)
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    #[instrument(
        name = "users_admin.http.mail.send_password",
        skip_all,
        fields(mail_base = %self.base, to = %mail.to)
    )]
    async fn send_password(&self, mail: &PasswordMail) -> Result<(), DomainError> {
        let url = self.endpoint()?;
        let body = MailRequest {
            to: &mail.to,
            subject: &mail.subject,
            template: PASSWORD_TEMPLATE,
            data: PasswordData {
                username: &mail.username,
                full_name: &mail.full_name,
                password: &mail.password,
            },
        };

        let response = self
            .client
            .post_json(url.as_str(), &body)
            .await
            .with_context(|| "POST /api/mail")
            .map_err(|e| DomainError::mailer(format!("{e:#}")))?;

        if !response.status().is_success() {
            return Err(DomainError::mailer(format!("HTTP {}", response.status())));
        }

        tracing::debug!("password mail accepted by gateway");
        Ok(())
    }
}
