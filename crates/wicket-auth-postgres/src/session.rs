//! Session storage over `auth_sessions`.
//!
//! Rotation is a conditional `UPDATE` keyed on the stored secondary hash:
//! the database resolves concurrent refreshes presenting the same token to
//! exactly one winner.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;
use uuid::Uuid;

use wicket_auth::AuthResult;
use wicket_auth::storage::SessionStorage;
use wicket_auth::types::Session;

use crate::{PgPool, db_error};

type SessionTuple = (
    Uuid,
    Uuid,
    String,
    String,
    OffsetDateTime,
    OffsetDateTime,
    Option<OffsetDateTime>,
);

fn session_from_tuple(row: SessionTuple) -> Session {
    Session {
        id: row.0,
        user_id: row.1,
        primary_key_hash: row.2,
        secondary_key_hash: row.3,
        created_at: row.4,
        rotated_at: row.5,
        revoked_at: row.6,
    }
}

const SESSION_COLUMNS: &str =
    "id, user_id, primary_key_hash, secondary_key_hash, created_at, rotated_at, revoked_at";

/// PostgreSQL session backend.
#[derive(Debug)]
pub struct PgSessionStorage {
    pool: Arc<PgPool>,
}

impl PgSessionStorage {
    /// Creates a session backend over the given pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStorage for PgSessionStorage {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        query(
            r#"
            INSERT INTO auth_sessions
                (id, user_id, primary_key_hash, secondary_key_hash,
                 created_at, rotated_at, revoked_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.primary_key_hash)
        .bind(&session.secondary_key_hash)
        .bind(session.created_at)
        .bind(session.rotated_at)
        .bind(session.revoked_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Session>> {
        let row: Option<SessionTuple> = query_as(&format!(
            "SELECT {SESSION_COLUMNS} FROM auth_sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(db_error)?;

        Ok(row.map(session_from_tuple))
    }

    async fn rotate(
        &self,
        id: Uuid,
        expected_secondary_hash: &str,
        new_primary_hash: &str,
        new_secondary_hash: &str,
    ) -> AuthResult<Option<Session>> {
        let row: Option<SessionTuple> = query_as(&format!(
            r#"
            UPDATE auth_sessions
            SET primary_key_hash = $3,
                secondary_key_hash = $4,
                rotated_at = NOW()
            WHERE id = $1
              AND secondary_key_hash = $2
              AND revoked_at IS NULL
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected_secondary_hash)
        .bind(new_primary_hash)
        .bind(new_secondary_hash)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(db_error)?;

        Ok(row.map(session_from_tuple))
    }

    async fn revoke(&self, id: Uuid) -> AuthResult<()> {
        query(
            r#"
            UPDATE auth_sessions
            SET revoked_at = NOW()
            WHERE id = $1
              AND revoked_at IS NULL
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> AuthResult<u64> {
        let result = query(
            r#"
            UPDATE auth_sessions
            SET revoked_at = NOW()
            WHERE user_id = $1
              AND revoked_at IS NULL
            "#,
        )
        .bind(user_id)
        .execute(self.pool.as_ref())
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected())
    }

    async fn cleanup_revoked(&self, before: OffsetDateTime) -> AuthResult<u64> {
        let result = query("DELETE FROM auth_sessions WHERE revoked_at < $1")
            .bind(before)
            .execute(self.pool.as_ref())
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }
}
