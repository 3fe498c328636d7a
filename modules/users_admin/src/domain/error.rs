use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {hash}")]
    UserNotFound { hash: String },

    #[error("Role not found: {hash}")]
    RoleNotFound { hash: String },

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Could not generate a unique {what} after {attempts} attempts")]
    GenerationExhausted { what: &'static str, attempts: u32 },

    #[error("Mail delivery failed: {message}")]
    Mailer { message: String },

    #[error("Password hashing failed: {message}")]
    PasswordHash { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(hash: impl Into<String>) -> Self {
        Self::UserNotFound { hash: hash.into() }
    }

    pub fn role_not_found(hash: impl Into<String>) -> Self {
        Self::RoleNotFound { hash: hash.into() }
    }

    pub fn email_already_exists(email: String) -> Self {
        Self::EmailAlreadyExists { email }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn generation_exhausted(what: &'static str, attempts: u32) -> Self {
        Self::GenerationExhausted { what, attempts }
    }

    pub fn mailer(message: impl Into<String>) -> Self {
        Self::Mailer {
            message: message.into(),
        }
    }

    pub fn password_hash(message: impl Into<String>) -> Self {
        Self::PasswordHash {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for DomainError {
    fn from(e: anyhow::Error) -> Self {
        Self::database(format!("{e:#}"))
    }
}
