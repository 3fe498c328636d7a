use std::sync::Arc;

use adminkit::{Page, PageRequest};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::config::UsersAdminConfig;
use crate::contract::model::{Role, StoredUser, User, UserForm, UserInput};
use crate::domain::error::DomainError;
use crate::domain::generator::{random_alphanumeric, username_base, username_candidate};
use crate::domain::ports::{Mailer, PasswordHasher, PasswordMail};
use crate::domain::repo::{NewUserRecord, RolesRepository, TrashScope, UserChanges, UsersRepository};

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 30;
const EMAIL_MAX_CHARS: usize = 255;

/// Domain service behind the admin user screens.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    users: Arc<dyn UsersRepository>,
    roles: Arc<dyn RolesRepository>,
    mailer: Arc<dyn Mailer>,
    hasher: Arc<dyn PasswordHasher>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub items_per_page: u64,
    pub max_items_per_page: u64,
    pub password_length: usize,
    pub hash_length: usize,
    pub max_generation_attempts: u32,
    pub mail_subject: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from(&UsersAdminConfig::default())
    }
}

impl From<&UsersAdminConfig> for ServiceConfig {
    fn from(cfg: &UsersAdminConfig) -> Self {
        Self {
            items_per_page: cfg.items_per_page,
            max_items_per_page: cfg.max_items_per_page,
            password_length: cfg.password_length,
            hash_length: cfg.hash_length,
            max_generation_attempts: cfg.max_generation_attempts.max(1),
            mail_subject: cfg.mail_subject.clone(),
        }
    }
}

impl Service {
    pub fn new(
        users: Arc<dyn UsersRepository>,
        roles: Arc<dyn RolesRepository>,
        mailer: Arc<dyn Mailer>,
        hasher: Arc<dyn PasswordHasher>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            users,
            roles,
            mailer,
            hasher,
            config,
        }
    }

    /// Page request for `?page=N`, sized by the configured page length.
    pub fn page_request(&self, page: Option<u64>, per_page: Option<u64>) -> PageRequest {
        PageRequest::new(
            page,
            per_page,
            self.config.items_per_page,
            self.config.max_items_per_page,
        )
    }

    // --- views ---

    #[instrument(name = "users_admin.service.list_users", skip(self), fields(page = page.page))]
    pub async fn list_users(&self, page: PageRequest) -> Result<Page<User>, DomainError> {
        let users = self.users.list_page(TrashScope::Active, page).await?;
        debug!(count = users.items.len(), total = users.page_info.total, "listed users");
        Ok(users)
    }

    #[instrument(name = "users_admin.service.list_trashed", skip(self), fields(page = page.page))]
    pub async fn list_trashed(&self, page: PageRequest) -> Result<Page<User>, DomainError> {
        let users = self.users.list_page(TrashScope::Trashed, page).await?;
        debug!(count = users.items.len(), total = users.page_info.total, "listed trashed users");
        Ok(users)
    }

    #[instrument(name = "users_admin.service.create_form", skip(self))]
    pub async fn create_form(&self) -> Result<UserForm, DomainError> {
        Ok(UserForm {
            roles: self.roles.all().await?,
            user: None,
        })
    }

    #[instrument(name = "users_admin.service.edit_form", skip(self))]
    pub async fn edit_form(&self, hash: &str) -> Result<UserForm, DomainError> {
        let user = self.find_active(hash).await?;
        Ok(UserForm {
            roles: self.roles.all().await?,
            user: Some(user),
        })
    }

    // --- mutations ---

    /// Create a user with generated credentials and mail the password to them.
    ///
    /// A mail failure is returned as-is; the user stays persisted.
    #[instrument(name = "users_admin.service.store_user", skip(self, input))]
    pub async fn store_user(&self, input: UserInput) -> Result<StoredUser, DomainError> {
        info!("Creating new user");
        let stored = self.store_or_update_user(input, None).await?;

        let password = stored
            .password
            .clone()
            .ok_or_else(|| DomainError::password_hash("no password generated for new user"))?;
        let mail = PasswordMail {
            to: stored.user.email.clone(),
            subject: self.config.mail_subject.clone(),
            username: stored.user.username.clone(),
            full_name: stored.user.full_name(),
            password,
        };
        if let Err(e) = self.mailer.send_password(&mail).await {
            warn!(user = %stored.user.hash, error = %e, "user created but password mail failed");
            return Err(e);
        }

        info!(user = %stored.user.hash, username = %stored.user.username, "Successfully created user");
        Ok(stored)
    }

    #[instrument(name = "users_admin.service.update_user", skip(self, input))]
    pub async fn update_user(&self, hash: &str, input: UserInput) -> Result<User, DomainError> {
        info!("Updating user");
        let stored = self.store_or_update_user(input, Some(hash)).await?;
        info!("Successfully updated user");
        Ok(stored.user)
    }

    /// Soft-delete. Returns the user as it was trashed.
    #[instrument(name = "users_admin.service.delete_user", skip(self))]
    pub async fn delete_user(&self, hash: &str) -> Result<User, DomainError> {
        info!("Deleting user");
        let user = self.find_active(hash).await?;
        let trashed = self.users.set_deleted_at(user.id, Some(Utc::now())).await?;
        info!("Successfully deleted user");
        Ok(trashed)
    }

    #[instrument(name = "users_admin.service.restore_user", skip(self))]
    pub async fn restore_user(&self, hash: &str) -> Result<User, DomainError> {
        info!("Restoring user");
        let user = self
            .users
            .find_by_hash(hash, TrashScope::Trashed)
            .await?
            .ok_or_else(|| DomainError::user_not_found(hash))?;
        let restored = self.users.set_deleted_at(user.id, None).await?;
        info!("Successfully restored user");
        Ok(restored)
    }

    /// Shared create/update path.
    ///
    /// Without `hash` a new user is built with a generated password, opaque
    /// hash and username. With `hash` the active user is loaded and its
    /// fields are replaced. Both assign the role looked up by its hash.
    #[instrument(name = "users_admin.service.store_or_update_user", skip(self, input))]
    pub async fn store_or_update_user(
        &self,
        input: UserInput,
        hash: Option<&str>,
    ) -> Result<StoredUser, DomainError> {
        let existing = match hash {
            Some(h) => Some(self.find_active(h).await?),
            None => None,
        };

        let input = self.validate(input, existing.as_ref().map(|u| u.id)).await?;
        let role = self.resolve_role(&input.role).await?;

        match existing {
            None => {
                let password = random_alphanumeric(self.config.password_length);
                let password_hash = self.hasher.hash(&password)?;
                let record = NewUserRecord {
                    hash: self.unique_hash().await?,
                    username: self.unique_username(&input.name, &input.firstname).await?,
                    name: input.name,
                    firstname: input.firstname,
                    email: input.email,
                    password_hash,
                    role_id: role.id,
                    created_at: Utc::now(),
                };
                let user = self.users.insert(record).await?;
                debug!(user = %user.hash, "inserted user");
                Ok(StoredUser {
                    user,
                    password: Some(password),
                })
            }
            Some(current) => {
                let changes = UserChanges {
                    name: input.name,
                    firstname: input.firstname,
                    email: input.email,
                    role_id: role.id,
                    updated_at: Utc::now(),
                };
                let user = self.users.update(current.id, changes).await?;
                Ok(StoredUser {
                    user,
                    password: None,
                })
            }
        }
    }

    // --- helpers ---

    async fn find_active(&self, hash: &str) -> Result<User, DomainError> {
        self.users
            .find_by_hash(hash, TrashScope::Active)
            .await?
            .ok_or_else(|| DomainError::user_not_found(hash))
    }

    async fn resolve_role(&self, role_hash: &str) -> Result<Role, DomainError> {
        self.roles
            .find_by_hash(role_hash)
            .await?
            .ok_or_else(|| DomainError::role_not_found(role_hash))
    }

    /// Opaque hash not used by any user, trashed ones included.
    async fn unique_hash(&self) -> Result<String, DomainError> {
        for _ in 0..self.config.max_generation_attempts {
            let candidate = random_alphanumeric(self.config.hash_length);
            if !self.users.hash_exists(&candidate).await? {
                return Ok(candidate);
            }
            debug!("generated hash collided, retrying");
        }
        Err(DomainError::generation_exhausted(
            "hash",
            self.config.max_generation_attempts,
        ))
    }

    async fn unique_username(&self, name: &str, firstname: &str) -> Result<String, DomainError> {
        let base = username_base(name, firstname);
        for attempt in 0..self.config.max_generation_attempts {
            let candidate = username_candidate(&base, attempt);
            if !self.users.username_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(DomainError::generation_exhausted(
            "username",
            self.config.max_generation_attempts,
        ))
    }

    /// Trim and check the submitted form; returns the normalized input.
    async fn validate(
        &self,
        input: UserInput,
        except_id: Option<i32>,
    ) -> Result<UserInput, DomainError> {
        let input = UserInput {
            name: input.name.trim().to_string(),
            firstname: input.firstname.trim().to_string(),
            email: input.email.trim().to_string(),
            role: input.role.trim().to_string(),
        };

        validate_name("name", &input.name)?;
        validate_name("firstname", &input.firstname)?;
        validate_email(&input.email)?;
        if input.role.is_empty() {
            return Err(DomainError::validation("role", "role is required"));
        }

        if self.users.email_exists(&input.email, except_id).await? {
            return Err(DomainError::email_already_exists(input.email));
        }
        Ok(input)
    }
}

fn validate_name(field: &str, value: &str) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(DomainError::validation(field, format!("{field} is required")));
    }
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(DomainError::validation(
            field,
            format!("{field} must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.is_empty() {
        return Err(DomainError::validation("email", "email is required"));
    }
    if email.chars().count() > EMAIL_MAX_CHARS {
        return Err(DomainError::validation(
            "email",
            format!("email must be at most {EMAIL_MAX_CHARS} characters"),
        ));
    }
    let valid = match email.rsplit_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::validation(
            "email",
            format!("'{email}' is not a valid email address"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_bounds() {
        assert!(validate_name("name", "Do").is_ok());
        assert!(validate_name("name", &"x".repeat(30)).is_ok());
        assert!(validate_name("name", "D").is_err());
        assert!(validate_name("name", &"x".repeat(31)).is_err());
        assert!(matches!(
            validate_name("firstname", ""),
            Err(DomainError::Validation { field, .. }) if field == "firstname"
        ));
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("jane.doe@mail.example.org").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("jane").is_err());
        assert!(validate_email("jane@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jane@.com").is_err());
        assert!(validate_email("ja ne@example.com").is_err());
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(validate_email(&long).is_err());
    }

    #[test]
    fn config_conversion_keeps_at_least_one_attempt() {
        let cfg = UsersAdminConfig {
            max_generation_attempts: 0,
            ..UsersAdminConfig::default()
        };
        assert_eq!(ServiceConfig::from(&cfg).max_generation_attempts, 1);
    }
}
