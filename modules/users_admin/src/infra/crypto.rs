use argon2::{
    password_hash::{PasswordHasher as _, Salt, SaltString},
    Argon2,
};
use rand::Rng;

use crate::domain::error::DomainError;
use crate::domain::ports::PasswordHasher;

/// Argon2id with the crate's default parameters and a random salt per hash.
#[derive(Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plain: &str) -> Result<String, DomainError> {
        let mut salt_bytes = [0u8; Salt::RECOMMENDED_LENGTH];
        rand::rng().fill(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| DomainError::password_hash(e.to_string()))?;
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| DomainError::password_hash(e.to_string()))?;
        Ok(hash.to_string())
    }
}
