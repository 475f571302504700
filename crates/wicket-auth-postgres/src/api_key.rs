//! API key storage over `auth_api_keys`.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;
use uuid::Uuid;

use wicket_auth::AuthResult;
use wicket_auth::storage::ApiKeyStorage;
use wicket_auth::types::ApiKey;

use crate::{PgPool, db_error};

type ApiKeyTuple = (Uuid, String, i32, bool, OffsetDateTime);

fn api_key_from_tuple(row: ApiKeyTuple) -> ApiKey {
    ApiKey {
        id: row.0,
        key: row.1,
        version: row.2,
        enabled: row.3,
        created_at: row.4,
    }
}

/// PostgreSQL API key backend.
#[derive(Debug)]
pub struct PgApiKeyStorage {
    pool: Arc<PgPool>,
}

impl PgApiKeyStorage {
    /// Creates an API key backend over the given pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyStorage for PgApiKeyStorage {
    async fn find_by_key(&self, key: &str) -> AuthResult<Option<ApiKey>> {
        let row: Option<ApiKeyTuple> = query_as(
            "SELECT id, key, version, enabled, created_at FROM auth_api_keys WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(db_error)?;

        Ok(row.map(api_key_from_tuple))
    }

    async fn ensure(&self, api_key: &ApiKey) -> AuthResult<()> {
        query(
            r#"
            INSERT INTO auth_api_keys (id, key, version, enabled, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(api_key.id)
        .bind(&api_key.key)
        .bind(api_key.version)
        .bind(api_key.enabled)
        .bind(api_key.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(db_error)?;
        Ok(())
    }
}
