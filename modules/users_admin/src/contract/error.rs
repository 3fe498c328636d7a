use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsersAdminError {
    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("User with email '{email}' already exists")]
    Conflict { email: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Dependency unavailable: {message}")]
    Unavailable { message: String },

    #[error("Internal error")]
    Internal,
}

impl UsersAdminError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn conflict(email: String) -> Self {
        Self::Conflict { email }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for UsersAdminError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { hash } => Self::not_found(format!("user {hash}")),
            RoleNotFound { hash } => Self::validation(format!("role: unknown role '{hash}'")),
            EmailAlreadyExists { email } => Self::conflict(email),
            Validation { field, message } => Self::validation(format!("{field}: {message}")),
            Mailer { message } => Self::unavailable(format!("mailer: {message}")),
            GenerationExhausted { .. } | PasswordHash { .. } | Database { .. } => {
                Self::internal()
            }
        }
    }
}
