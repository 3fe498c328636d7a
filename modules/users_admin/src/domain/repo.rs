use adminkit::{Page, PageRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{Role, User};

/// Which side of the soft-delete line a query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashScope {
    Active,
    Trashed,
}

/// Fully-formed row for a new user. The service generates every value.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub hash: String,
    pub username: String,
    pub name: String,
    pub firstname: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Editable columns of an existing user.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub firstname: String,
    pub email: String,
    pub role_id: i32,
    pub updated_at: DateTime<Utc>,
}

/// Port for the domain layer: persistence operations the domain needs.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_hash(&self, hash: &str, scope: TrashScope) -> anyhow::Result<Option<User>>;
    /// Uniqueness checks look at trashed users too.
    async fn hash_exists(&self, hash: &str) -> anyhow::Result<bool>;
    async fn username_exists(&self, username: &str) -> anyhow::Result<bool>;
    /// `except_id` skips the user being edited.
    async fn email_exists(&self, email: &str, except_id: Option<i32>) -> anyhow::Result<bool>;
    async fn insert(&self, record: NewUserRecord) -> anyhow::Result<User>;
    async fn update(&self, id: i32, changes: UserChanges) -> anyhow::Result<User>;
    /// `Some` trashes the user, `None` restores it.
    async fn set_deleted_at(
        &self,
        id: i32,
        deleted_at: Option<DateTime<Utc>>,
    ) -> anyhow::Result<User>;
    async fn list_page(&self, scope: TrashScope, page: PageRequest) -> anyhow::Result<Page<User>>;
}

/// Read-only role lookups.
#[async_trait]
pub trait RolesRepository: Send + Sync {
    async fn all(&self) -> anyhow::Result<Vec<Role>>;
    async fn find_by_hash(&self, hash: &str) -> anyhow::Result<Option<Role>>;
}
