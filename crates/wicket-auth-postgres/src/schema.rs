//! Schema bootstrap.
//!
//! The table set is small and stable, so the schema is created in place
//! with `IF NOT EXISTS` guards instead of a migration chain.

use sqlx_core::query::query;

use wicket_auth::error::AuthError;

use crate::{PgPool, db_error};

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS auth_roles (
        id          UUID PRIMARY KEY,
        code        TEXT NOT NULL UNIQUE,
        enabled     BOOLEAN NOT NULL DEFAULT TRUE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS auth_users (
        id              UUID PRIMARY KEY,
        name            TEXT NOT NULL,
        email           TEXT NOT NULL UNIQUE,
        password_hash   TEXT NOT NULL,
        profile_pic_url TEXT,
        enabled         BOOLEAN NOT NULL DEFAULT TRUE,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS auth_user_roles (
        user_id  UUID NOT NULL REFERENCES auth_users(id),
        role_id  UUID NOT NULL REFERENCES auth_roles(id),
        PRIMARY KEY (user_id, role_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS auth_sessions (
        id                  UUID PRIMARY KEY,
        user_id             UUID NOT NULL REFERENCES auth_users(id),
        primary_key_hash    TEXT NOT NULL,
        secondary_key_hash  TEXT NOT NULL,
        created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        rotated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        revoked_at          TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS auth_sessions_user_id_idx
        ON auth_sessions (user_id)
        WHERE revoked_at IS NULL
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS auth_api_keys (
        id          UUID PRIMARY KEY,
        key         TEXT NOT NULL UNIQUE,
        version     INTEGER NOT NULL DEFAULT 1,
        enabled     BOOLEAN NOT NULL DEFAULT TRUE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

/// Creates the auth tables and indexes if missing. Idempotent.
///
/// # Errors
///
/// Returns `DependencyUnavailable` if any statement fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AuthError> {
    for statement in DDL {
        query(statement).execute(pool).await.map_err(db_error)?;
    }
    tracing::debug!(statements = DDL.len(), "auth schema ensured");
    Ok(())
}
