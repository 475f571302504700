//! # wicket-auth-postgres
//!
//! PostgreSQL storage backend for the Wicket auth core.
//!
//! Provides persistent storage for:
//!
//! - Users and their role assignments
//! - Roles
//! - Sessions (token hash pairs with rotation and revocation)
//! - API keys
//!
//! Session rotation is a single conditional `UPDATE` keyed on the stored
//! refresh hash, so concurrent refreshes presenting the same token resolve
//! to exactly one winner at the database level.
//!
//! # Example
//!
//! ```ignore
//! use wicket_auth_postgres::PostgresAuthStorage;
//!
//! let storage = PostgresAuthStorage::connect("postgres://localhost/wicket").await?;
//! storage.ensure_schema().await?;
//! let users = storage.users();
//! ```

pub mod api_key;
pub mod role;
pub mod schema;
pub mod session;
pub mod user;

use std::sync::Arc;

use sqlx_core::pool::Pool;
use sqlx_postgres::Postgres;

use wicket_auth::error::AuthError;

pub use api_key::PgApiKeyStorage;
pub use role::PgRoleStorage;
pub use session::PgSessionStorage;
pub use user::PgUserStorage;

/// PostgreSQL connection pool type alias.
pub type PgPool = Pool<Postgres>;

/// Translates a database failure into the core's error vocabulary.
///
/// Every sqlx error surfaces as `DependencyUnavailable`: from the caller's
/// perspective the store itself failed, regardless of the low-level cause.
pub(crate) fn db_error(err: sqlx_core::Error) -> AuthError {
    AuthError::dependency_unavailable(format!("postgres: {err}"))
}

// =============================================================================
// PostgreSQL Auth Storage
// =============================================================================

/// PostgreSQL storage backend for the auth core.
///
/// Holds a connection pool and hands out per-entity backends that implement
/// the core's storage traits.
#[derive(Debug, Clone)]
pub struct PostgresAuthStorage {
    pool: Arc<PgPool>,
}

impl PostgresAuthStorage {
    /// Creates storage around an existing connection pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Creates storage by connecting to the database.
    ///
    /// # Errors
    ///
    /// Returns `DependencyUnavailable` if the connection fails.
    pub async fn connect(database_url: &str) -> Result<Self, AuthError> {
        use sqlx_core::pool::PoolOptions;
        let pool = PoolOptions::<Postgres>::new()
            .connect(database_url)
            .await
            .map_err(db_error)?;
        Ok(Self::new(Arc::new(pool)))
    }

    /// Creates the auth tables if they do not exist yet. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `DependencyUnavailable` if any DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<(), AuthError> {
        schema::ensure_schema(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// User storage backend.
    #[must_use]
    pub fn users(&self) -> Arc<PgUserStorage> {
        Arc::new(PgUserStorage::new(Arc::clone(&self.pool)))
    }

    /// Role storage backend.
    #[must_use]
    pub fn roles(&self) -> Arc<PgRoleStorage> {
        Arc::new(PgRoleStorage::new(Arc::clone(&self.pool)))
    }

    /// Session storage backend.
    #[must_use]
    pub fn sessions(&self) -> Arc<PgSessionStorage> {
        Arc::new(PgSessionStorage::new(Arc::clone(&self.pool)))
    }

    /// API key storage backend.
    #[must_use]
    pub fn api_keys(&self) -> Arc<PgApiKeyStorage> {
        Arc::new(PgApiKeyStorage::new(Arc::clone(&self.pool)))
    }
}
