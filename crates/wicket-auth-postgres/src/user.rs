//! User storage over `auth_users` and `auth_user_roles`.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;
use uuid::Uuid;

use wicket_auth::AuthResult;
use wicket_auth::error::AuthError;
use wicket_auth::storage::UserStorage;
use wicket_auth::types::{Role, RoleCode, User};

use crate::{PgPool, db_error};

type UserTuple = (
    Uuid,
    String,
    String,
    String,
    Option<String>,
    bool,
    OffsetDateTime,
    OffsetDateTime,
);

type RoleTuple = (Uuid, String, bool, OffsetDateTime);

/// PostgreSQL user backend.
#[derive(Debug)]
pub struct PgUserStorage {
    pool: Arc<PgPool>,
}

impl PgUserStorage {
    /// Creates a user backend over the given pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn roles_for(&self, user_id: Uuid) -> AuthResult<Vec<Role>> {
        let rows: Vec<RoleTuple> = query_as(
            r#"
            SELECT r.id, r.code, r.enabled, r.created_at
            FROM auth_roles r
            JOIN auth_user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(db_error)?;

        rows.into_iter().map(role_from_tuple).collect()
    }

    async fn hydrate(&self, row: UserTuple) -> AuthResult<User> {
        let roles = self.roles_for(row.0).await?;
        Ok(User {
            id: row.0,
            name: row.1,
            email: row.2,
            password_hash: row.3,
            profile_pic_url: row.4,
            roles,
            enabled: row.5,
            created_at: row.6,
            updated_at: row.7,
        })
    }
}

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

const SELECT_USER: &str = r#"
    SELECT id, name, email, password_hash, profile_pic_url,
           enabled, created_at, updated_at
    FROM auth_users
"#;

#[async_trait]
impl UserStorage for PgUserStorage {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        query(
            r#"
            INSERT INTO auth_users
                (id, name, email, password_hash, profile_pic_url,
                 enabled, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile_pic_url)
        .bind(user.enabled)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx_core::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return AuthError::bad_request("email already registered");
            }
            db_error(e)
        })?;

        for role in &user.roles {
            query("INSERT INTO auth_user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(user.id)
                .bind(role.id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        let row: Option<UserTuple> = query_as(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(db_error)?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let row: Option<UserTuple> = query_as(&format!("{SELECT_USER} WHERE email = $1"))
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(db_error)?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn set_enabled(&self, id: Uuid, enabled: bool) -> AuthResult<()> {
        let result = query(
            r#"
            UPDATE auth_users
            SET enabled = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(enabled)
        .execute(self.pool.as_ref())
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::not_found("user not found"));
        }
        Ok(())
    }
}
