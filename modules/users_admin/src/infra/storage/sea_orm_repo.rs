//! SeaORM-backed repository implementations for the domain ports.
//!
//! Both structs are generic over `C: ConnectionTrait`, so they can be built
//! with a `DatabaseConnection` or a transaction.

use adminkit::{Page, PageInfo, PageRequest};
use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use crate::contract::model::{Role, User};
use crate::domain::repo::{NewUserRecord, RolesRepository, TrashScope, UserChanges, UsersRepository};
use crate::infra::storage::entity::{roles, users};
use crate::infra::storage::mapper::{role_to_contract, user_to_contract};

fn scoped(select: Select<users::Entity>, scope: TrashScope) -> Select<users::Entity> {
    match scope {
        TrashScope::Active => select.filter(users::Column::DeletedAt.is_null()),
        TrashScope::Trashed => select.filter(users::Column::DeletedAt.is_not_null()),
    }
}

pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    async fn load(&self, id: i32) -> anyhow::Result<User> {
        let (user, role) = users::Entity::find_by_id(id)
            .find_also_related(roles::Entity)
            .one(&self.conn)
            .await
            .context("load user failed")?
            .ok_or_else(|| anyhow!("user {id} vanished"))?;
        user_to_contract(user, role)
    }

    async fn find_model(&self, id: i32) -> anyhow::Result<users::Model> {
        users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find user by id failed")?
            .ok_or_else(|| anyhow!("user {id} not found"))
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_hash(&self, hash: &str, scope: TrashScope) -> anyhow::Result<Option<User>> {
        let found = scoped(users::Entity::find(), scope)
            .filter(users::Column::Hash.eq(hash))
            .find_also_related(roles::Entity)
            .one(&self.conn)
            .await
            .context("find_by_hash failed")?;
        found
            .map(|(user, role)| user_to_contract(user, role))
            .transpose()
    }

    async fn hash_exists(&self, hash: &str) -> anyhow::Result<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Hash.eq(hash))
            .count(&self.conn)
            .await
            .context("hash_exists failed")?;
        Ok(count > 0)
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.conn)
            .await
            .context("username_exists failed")?;
        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str, except_id: Option<i32>) -> anyhow::Result<bool> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(id) = except_id {
            query = query.filter(users::Column::Id.ne(id));
        }
        let count = query
            .count(&self.conn)
            .await
            .context("email_exists failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, record: NewUserRecord) -> anyhow::Result<User> {
        let m = users::ActiveModel {
            id: NotSet,
            hash: Set(record.hash),
            username: Set(record.username),
            name: Set(record.name),
            firstname: Set(record.firstname),
            email: Set(record.email),
            password: Set(record.password_hash),
            role_id: Set(record.role_id),
            created_at: Set(record.created_at),
            updated_at: Set(record.created_at),
            deleted_at: Set(None),
        };
        let inserted = m.insert(&self.conn).await.context("insert failed")?;
        self.load(inserted.id).await
    }

    async fn update(&self, id: i32, changes: UserChanges) -> anyhow::Result<User> {
        let mut m = self.find_model(id).await?.into_active_model();
        m.name = Set(changes.name);
        m.firstname = Set(changes.firstname);
        m.email = Set(changes.email);
        m.role_id = Set(changes.role_id);
        m.updated_at = Set(changes.updated_at);
        m.update(&self.conn).await.context("update failed")?;
        self.load(id).await
    }

    async fn set_deleted_at(
        &self,
        id: i32,
        deleted_at: Option<DateTime<Utc>>,
    ) -> anyhow::Result<User> {
        let mut m = self.find_model(id).await?.into_active_model();
        m.deleted_at = Set(deleted_at);
        m.update(&self.conn)
            .await
            .context("set_deleted_at failed")?;
        self.load(id).await
    }

    async fn list_page(&self, scope: TrashScope, page: PageRequest) -> anyhow::Result<Page<User>> {
        let total = scoped(users::Entity::find(), scope)
            .count(&self.conn)
            .await
            .context("count users failed")?;

        let rows = scoped(users::Entity::find(), scope)
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .find_also_related(roles::Entity)
            .all(&self.conn)
            .await
            .context("list_page failed")?;

        let items = rows
            .into_iter()
            .map(|(user, role)| user_to_contract(user, role))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Page::new(items, PageInfo::new(page, total)))
    }
}

pub struct SeaOrmRolesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmRolesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> RolesRepository for SeaOrmRolesRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn all(&self) -> anyhow::Result<Vec<Role>> {
        let rows = roles::Entity::find()
            .order_by_asc(roles::Column::Id)
            .all(&self.conn)
            .await
            .context("list roles failed")?;
        Ok(rows.into_iter().map(role_to_contract).collect())
    }

    async fn find_by_hash(&self, hash: &str) -> anyhow::Result<Option<Role>> {
        let found = roles::Entity::find()
            .filter(roles::Column::Hash.eq(hash))
            .one(&self.conn)
            .await
            .context("find role by hash failed")?;
        Ok(found.map(role_to_contract))
    }
}
