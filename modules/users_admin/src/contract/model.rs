use chrono::{DateTime, Utc};

/// Read-only role a user is assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i32,
    /// Public opaque identifier used by forms.
    pub hash: String,
    pub name: String,
}

/// User account as exposed to other modules. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub hash: String,
    pub username: String,
    /// Family name.
    pub name: String,
    pub firstname: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        full_name(&self.firstname, &self.name)
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// "{firstname} {name}", as used in notices and mails.
pub fn full_name(firstname: &str, name: &str) -> String {
    format!("{firstname} {name}")
}

/// Submitted user form. `role` is the public hash of the role.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserInput {
    pub name: String,
    pub firstname: String,
    pub email: String,
    pub role: String,
}

/// Outcome of storing or updating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user: User,
    /// Generated plain password, only present for newly created users.
    pub password: Option<String>,
}

/// Data behind the create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub roles: Vec<Role>,
    pub user: Option<User>,
}
