//! Role storage over `auth_roles`.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;
use uuid::Uuid;

use wicket_auth::AuthResult;
use wicket_auth::error::AuthError;
use wicket_auth::storage::RoleStorage;
use wicket_auth::types::{Role, RoleCode};

use crate::{PgPool, db_error};

type RoleTuple = (Uuid, String, bool, OffsetDateTime);

fn role_from_tuple(row: RoleTuple) -> AuthResult<Role> {
    let code = RoleCode::parse(&row.1)
        .ok_or_else(|| AuthError::internal(format!("unknown role code in store: {}", row.1)))?;
    Ok(Role {
        id: row.0,
        code,
        enabled: row.2,
        created_at: row.3,
    })
}

/// PostgreSQL role backend.
#[derive(Debug)]
pub struct PgRoleStorage {
    pool: Arc<PgPool>,
}

impl PgRoleStorage {
    /// Creates a role backend over the given pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStorage for PgRoleStorage {
    async fn find_by_code(&self, code: RoleCode) -> AuthResult<Option<Role>> {
        let row: Option<RoleTuple> = query_as(
            "SELECT id, code, enabled, created_at FROM auth_roles WHERE code = $1",
        )
        .bind(code.as_str())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(db_error)?;

        row.map(role_from_tuple).transpose()
    }

    async fn list_enabled(&self) -> AuthResult<Vec<Role>> {
        let rows: Vec<RoleTuple> = query_as(
            "SELECT id, code, enabled, created_at FROM auth_roles WHERE enabled ORDER BY code",
        )
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(db_error)?;

        rows.into_iter().map(role_from_tuple).collect()
    }

    async fn ensure(&self, role: &Role) -> AuthResult<()> {
        query(
            r#"
            INSERT INTO auth_roles (id, code, enabled, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(role.id)
        .bind(role.code.as_str())
        .bind(role.enabled)
        .bind(role.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_tuple() {
        let now = OffsetDateTime::now_utc();
        let role = role_from_tuple((Uuid::new_v4(), "EDITOR".to_string(), true, now)).unwrap();
        assert_eq!(role.code, RoleCode::Editor);
        assert!(role.enabled);
    }

    #[test]
    fn test_unknown_stored_code_is_internal_error() {
        let now = OffsetDateTime::now_utc();
        let err = role_from_tuple((Uuid::new_v4(), "SUPERUSER".to_string(), true, now)).unwrap_err();
        assert!(err.is_server_error());
    }
}
