use std::ops::RangeInclusive;

use anyhow::ensure;
use serde::{Deserialize, Serialize};

/// Generated passwords shorter than this are refused.
pub const PASSWORD_LENGTH: RangeInclusive<usize> = 8..=128;
/// Opaque hashes must fit the 64-character `hash` column.
pub const HASH_LENGTH: RangeInclusive<usize> = 8..=64;

/// Configuration for the users_admin module (`modules.users_admin`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersAdminConfig {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u64,
    #[serde(default = "default_max_items_per_page")]
    pub max_items_per_page: u64,
    /// Locale for flash notices when the request does not ask for another one.
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_password_length")]
    pub password_length: usize,
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,
    /// Upper bound on regenerate-and-check rounds for hashes and usernames.
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,
    #[serde(default = "default_mail_subject")]
    pub mail_subject: String,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    /// Base URL of the mail gateway. Without it mails are only logged.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for UsersAdminConfig {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            max_items_per_page: default_max_items_per_page(),
            locale: default_locale(),
            password_length: default_password_length(),
            hash_length: default_hash_length(),
            max_generation_attempts: default_max_generation_attempts(),
            mail_subject: default_mail_subject(),
            mail: MailConfig::default(),
        }
    }
}

impl UsersAdminConfig {
    /// Reject settings the service cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            PASSWORD_LENGTH.contains(&self.password_length),
            "users_admin.password_length must be within {}..={} (got {})",
            PASSWORD_LENGTH.start(),
            PASSWORD_LENGTH.end(),
            self.password_length
        );
        ensure!(
            HASH_LENGTH.contains(&self.hash_length),
            "users_admin.hash_length must be within {}..={} (got {})",
            HASH_LENGTH.start(),
            HASH_LENGTH.end(),
            self.hash_length
        );
        ensure!(
            self.max_generation_attempts > 0,
            "users_admin.max_generation_attempts must be at least 1"
        );
        ensure!(
            self.items_per_page > 0 && self.items_per_page <= self.max_items_per_page,
            "users_admin.items_per_page must be within 1..={} (got {})",
            self.max_items_per_page,
            self.items_per_page
        );
        Ok(())
    }
}

fn default_items_per_page() -> u64 {
    10
}

fn default_max_items_per_page() -> u64 {
    100
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_password_length() -> usize {
    12
}

fn default_hash_length() -> usize {
    16
}

fn default_max_generation_attempts() -> u32 {
    100
}

fn default_mail_subject() -> String {
    "Blogify temporary password".to_string()
}
