use crate::domain::error::DomainError;

/// One-way password hashing. Returns a self-describing string fit for storage.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, DomainError>;
}
