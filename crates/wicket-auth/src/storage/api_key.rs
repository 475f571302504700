//! API key storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::ApiKey;

/// Storage operations for machine API keys.
///
/// Keys are administered out of band; this interface is read-mostly with an
/// idempotent seed hook for the server bootstrap.
#[async_trait]
pub trait ApiKeyStorage: Send + Sync {
    /// Finds a key by its key string.
    ///
    /// Returns keys regardless of status; callers check `enabled`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_key(&self, key: &str) -> AuthResult<Option<ApiKey>>;

    /// Inserts a key if no record with its key string exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn ensure(&self, api_key: &ApiKey) -> AuthResult<()>;
}
