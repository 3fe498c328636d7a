use adminkit::{Page, PageRequest};
use async_trait::async_trait;

use crate::contract::{
    error::UsersAdminError,
    model::{StoredUser, User, UserForm, UserInput},
};

/// Public API of the users_admin module for in-process consumers.
#[async_trait]
pub trait UsersAdminApi: Send + Sync {
    /// Active (non-deleted) users.
    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, UsersAdminError>;

    /// Soft-deleted users only.
    async fn list_trashed(&self, page: PageRequest) -> Result<Page<User>, UsersAdminError>;

    async fn create_form(&self) -> Result<UserForm, UsersAdminError>;

    async fn edit_form(&self, hash: &str) -> Result<UserForm, UsersAdminError>;

    /// Create a user, generating credentials and mailing the password.
    async fn store_user(&self, input: UserInput) -> Result<StoredUser, UsersAdminError>;

    async fn update_user(&self, hash: &str, input: UserInput) -> Result<User, UsersAdminError>;

    async fn delete_user(&self, hash: &str) -> Result<User, UsersAdminError>;

    async fn restore_user(&self, hash: &str) -> Result<User, UsersAdminError>;
}
