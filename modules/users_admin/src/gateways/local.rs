use adminkit::{Page, PageRequest};
use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::UsersAdminApi,
    error::UsersAdminError,
    model::{StoredUser, User, UserForm, UserInput},
};
use crate::domain::service::Service;

/// In-process `UsersAdminApi` backed by the domain service.
pub struct UsersAdminLocalClient {
    service: Arc<Service>,
}

impl UsersAdminLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersAdminApi for UsersAdminLocalClient {
    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, UsersAdminError> {
        self.service.list_users(page).await.map_err(Into::into)
    }

    async fn list_trashed(&self, page: PageRequest) -> Result<Page<User>, UsersAdminError> {
        self.service.list_trashed(page).await.map_err(Into::into)
    }

    async fn create_form(&self) -> Result<UserForm, UsersAdminError> {
        self.service.create_form().await.map_err(Into::into)
    }

    async fn edit_form(&self, hash: &str) -> Result<UserForm, UsersAdminError> {
        self.service.edit_form(hash).await.map_err(Into::into)
    }

    async fn store_user(&self, input: UserInput) -> Result<StoredUser, UsersAdminError> {
        self.service.store_user(input).await.map_err(Into::into)
    }

    async fn update_user(&self, hash: &str, input: UserInput) -> Result<User, UsersAdminError> {
        self.service
            .update_user(hash, input)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, hash: &str) -> Result<User, UsersAdminError> {
        self.service.delete_user(hash).await.map_err(Into::into)
    }

    async fn restore_user(&self, hash: &str) -> Result<User, UsersAdminError> {
        self.service.restore_user(hash).await.map_err(Into::into)
    }
}
