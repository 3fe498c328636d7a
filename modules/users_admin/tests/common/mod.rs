#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use adminkit::{Page, PageRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use users_admin::{
    contract::model::{User, UserInput},
    domain::{
        error::DomainError,
        ports::{Mailer, PasswordHasher, PasswordMail},
        repo::{NewUserRecord, TrashScope, UserChanges, UsersRepository},
        service::{Service, ServiceConfig},
    },
    infra::storage::{migrations::Migrator, SeaOrmRolesRepository, SeaOrmUsersRepository},
};

/// Records every mail instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<PasswordMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<PasswordMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password(&self, mail: &PasswordMail) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send_password(&self, _mail: &PasswordMail) -> Result<(), DomainError> {
        Err(DomainError::mailer("gateway answered HTTP 503"))
    }
}

/// Argon2 is slow in debug builds; tests only need a recognizable transform.
pub struct PrefixHasher;

impl PasswordHasher for PrefixHasher {
    fn hash(&self, plain: &str) -> Result<String, DomainError> {
        Ok(format!("hashed:{plain}"))
    }
}

/// Fresh in-memory database with migrations (and seeded roles) applied.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn service_with(db: &DatabaseConnection, mailer: Arc<dyn Mailer>) -> Arc<Service> {
    Arc::new(Service::new(
        Arc::new(SeaOrmUsersRepository::new(db.clone())),
        Arc::new(SeaOrmRolesRepository::new(db.clone())),
        mailer,
        Arc::new(PrefixHasher),
        ServiceConfig::default(),
    ))
}

pub struct TestEnv {
    pub db: DatabaseConnection,
    pub service: Arc<Service>,
    pub mailer: Arc<RecordingMailer>,
}

pub async fn test_env() -> TestEnv {
    let db = create_test_db().await;
    let mailer = Arc::new(RecordingMailer::default());
    let service = service_with(&db, mailer.clone());
    TestEnv {
        db,
        service,
        mailer,
    }
}

/// Hash of the seeded role with the given name.
pub async fn role_hash(service: &Service, name: &str) -> String {
    service
        .create_form()
        .await
        .expect("create form")
        .roles
        .into_iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("role {name} not seeded"))
        .hash
}

pub fn input(name: &str, firstname: &str, email: &str, role: &str) -> UserInput {
    UserInput {
        name: name.to_string(),
        firstname: firstname.to_string(),
        email: email.to_string(),
        role: role.to_string(),
    }
}

/// Users repository that reports the first `hash_collisions` hash candidates
/// and `username_collisions` username candidates as taken.
pub struct CollidingUsers {
    inner: Arc<dyn UsersRepository>,
    hash_collisions: AtomicU32,
    username_collisions: AtomicU32,
    hash_lookups: Mutex<Vec<String>>,
}

impl CollidingUsers {
    pub fn new(db: &DatabaseConnection, hash_collisions: u32, username_collisions: u32) -> Self {
        Self {
            inner: Arc::new(SeaOrmUsersRepository::new(db.clone())),
            hash_collisions: AtomicU32::new(hash_collisions),
            username_collisions: AtomicU32::new(username_collisions),
            hash_lookups: Mutex::new(Vec::new()),
        }
    }

    /// Every hash candidate the service asked about, in order.
    pub fn hash_lookups(&self) -> Vec<String> {
        self.hash_lookups.lock().unwrap().clone()
    }
}

fn take_one(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl UsersRepository for CollidingUsers {
    async fn find_by_hash(&self, hash: &str, scope: TrashScope) -> anyhow::Result<Option<User>> {
        self.inner.find_by_hash(hash, scope).await
    }

    async fn hash_exists(&self, hash: &str) -> anyhow::Result<bool> {
        self.hash_lookups.lock().unwrap().push(hash.to_owned());
        if take_one(&self.hash_collisions) {
            return Ok(true);
        }
        self.inner.hash_exists(hash).await
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        if take_one(&self.username_collisions) {
            return Ok(true);
        }
        self.inner.username_exists(username).await
    }

    async fn email_exists(&self, email: &str, except_id: Option<i32>) -> anyhow::Result<bool> {
        self.inner.email_exists(email, except_id).await
    }

    async fn insert(&self, record: NewUserRecord) -> anyhow::Result<User> {
        self.inner.insert(record).await
    }

    async fn update(&self, id: i32, changes: UserChanges) -> anyhow::Result<User> {
        self.inner.update(id, changes).await
    }

    async fn set_deleted_at(
        &self,
        id: i32,
        deleted_at: Option<DateTime<Utc>>,
    ) -> anyhow::Result<User> {
        self.inner.set_deleted_at(id, deleted_at).await
    }

    async fn list_page(&self, scope: TrashScope, page: PageRequest) -> anyhow::Result<Page<User>> {
        self.inner.list_page(scope, page).await
    }
}

/// Service over `users` with a bounded number of generation attempts.
pub fn service_with_users(
    db: &DatabaseConnection,
    users: Arc<dyn UsersRepository>,
    max_generation_attempts: u32,
) -> Service {
    Service::new(
        users,
        Arc::new(SeaOrmRolesRepository::new(db.clone())),
        Arc::new(RecordingMailer::default()),
        Arc::new(PrefixHasher),
        ServiceConfig {
            max_generation_attempts,
            ..ServiceConfig::default()
        },
    )
}
