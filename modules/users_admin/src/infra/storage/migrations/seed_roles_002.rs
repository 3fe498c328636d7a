use chrono::Utc;
use sea_orm_migration::prelude::*;

use super::initial_001::Roles;
use crate::domain::generator::random_alphanumeric;

/// Roles every installation starts with.
pub const DEFAULT_ROLES: [&str; 4] = ["Admin", "Author", "Reviewer", "Member"];

const ROLE_HASH_LENGTH: usize = 16;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = Utc::now();
        let mut insert = Query::insert();
        insert.into_table(Roles::Table).columns([
            Roles::Hash,
            Roles::Name,
            Roles::CreatedAt,
            Roles::UpdatedAt,
        ]);
        for name in DEFAULT_ROLES {
            insert
                .values([
                    random_alphanumeric(ROLE_HASH_LENGTH).into(),
                    name.into(),
                    now.into(),
                    now.into(),
                ])
                .map_err(|e| DbErr::Custom(format!("invalid role seed row: {e}")))?;
        }
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Roles::Table)
            .and_where(Expr::col(Roles::Name).is_in(DEFAULT_ROLES))
            .to_owned();
        manager.exec_stmt(delete).await
    }
}
