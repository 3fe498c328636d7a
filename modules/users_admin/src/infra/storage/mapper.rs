use anyhow::anyhow;

use crate::contract::model::{Role, User};
use crate::infra::storage::entity::{roles, users};

pub fn role_to_contract(entity: roles::Model) -> Role {
    Role {
        id: entity.id,
        hash: entity.hash,
        name: entity.name,
    }
}

/// Join a user row with its role. A missing role breaks the FK invariant.
pub fn user_to_contract(entity: users::Model, role: Option<roles::Model>) -> anyhow::Result<User> {
    let role = role.ok_or_else(|| {
        anyhow!(
            "user {} references missing role {}",
            entity.hash,
            entity.role_id
        )
    })?;
    Ok(User {
        id: entity.id,
        hash: entity.hash,
        username: entity.username,
        name: entity.name,
        firstname: entity.firstname,
        email: entity.email,
        role: role_to_contract(role),
        created_at: entity.created_at,
        updated_at: entity.updated_at,
        deleted_at: entity.deleted_at,
    })
}
