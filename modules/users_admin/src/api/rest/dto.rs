use adminkit::{Flash, Page};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{Role, User, UserForm, UserInput};

/// Role as offered in the user form's select box.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RoleDto {
    pub hash: String,
    pub name: String,
}

/// REST DTO for a user. The numeric id stays internal; `hash` identifies the user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub hash: String,
    pub username: String,
    pub name: String,
    pub firstname: String,
    pub full_name: String,
    pub email: String,
    pub role: RoleDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Data behind the users index and trashed screens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserIndexView {
    pub users: Page<UserDto>,
    pub trashed: bool,
    /// Flash notice left by the previous mutation, if any.
    pub notice: Option<Flash>,
}

/// Data behind the create and edit forms.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserFormView {
    pub roles: Vec<RoleDto>,
    pub user: Option<UserDto>,
}

/// Submitted user form, urlencoded or JSON. `role` is a role hash.
///
/// Missing fields deserialize as empty so they surface as validation errors.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(default)]
pub struct UserFormReq {
    pub name: String,
    pub firstname: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IndexQuery {
    /// 1-based page number.
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        Self {
            hash: role.hash,
            name: role.name,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            hash: user.hash,
            username: user.username,
            name: user.name,
            firstname: user.firstname,
            email: user.email,
            role: user.role.into(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            deleted_at: user.deleted_at,
        }
    }
}

impl From<UserForm> for UserFormView {
    fn from(form: UserForm) -> Self {
        Self {
            roles: form.roles.into_iter().map(RoleDto::from).collect(),
            user: form.user.map(UserDto::from),
        }
    }
}

impl UserIndexView {
    pub fn new(users: Page<User>, trashed: bool, notice: Option<Flash>) -> Self {
        Self {
            users: users.map_items(UserDto::from),
            trashed,
            notice,
        }
    }
}

impl From<UserFormReq> for UserInput {
    fn from(req: UserFormReq) -> Self {
        Self {
            name: req.name,
            firstname: req.firstname,
            email: req.email,
            role: req.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: 3,
            hash: "aB3dE5fG7hJ9kL1m".into(),
            username: "doej".into(),
            name: "Doe".into(),
            firstname: "Jane".into(),
            email: "jane@example.com".into(),
            role: Role {
                id: 1,
                hash: "r0leHash".into(),
                name: "Admin".into(),
            },
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn user_dto_hides_internal_id() {
        let v = serde_json::to_value(UserDto::from(user())).unwrap();
        assert!(v.get("id").is_none());
        assert_eq!(v["hash"], "aB3dE5fG7hJ9kL1m");
        assert_eq!(v["full_name"], "Jane Doe");
        assert_eq!(v["role"]["hash"], "r0leHash");
        assert!(v.get("deleted_at").is_none());
    }

    #[test]
    fn form_request_tolerates_missing_fields() {
        let req: UserFormReq = serde_json::from_str(r#"{"name":"Doe"}"#).unwrap();
        let input = UserInput::from(req);
        assert_eq!(input.name, "Doe");
        assert!(input.email.is_empty());
    }
}
