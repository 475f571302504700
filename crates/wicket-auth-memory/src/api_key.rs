//! In-memory API key storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use wicket_auth::AuthResult;
use wicket_auth::storage::ApiKeyStorage;
use wicket_auth::types::ApiKey;

/// API key backend over a `RwLock<HashMap>` keyed by key string.
#[derive(Debug, Default)]
pub struct MemoryApiKeyStorage {
    keys: Arc<RwLock<HashMap<String, ApiKey>>>,
}

impl MemoryApiKeyStorage {
    /// Creates an empty key store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyStorage for MemoryApiKeyStorage {
    async fn find_by_key(&self, key: &str) -> AuthResult<Option<ApiKey>> {
        Ok(self.keys.read().await.get(key).cloned())
    }

    async fn ensure(&self, api_key: &ApiKey) -> AuthResult<()> {
        self.keys
            .write()
            .await
            .entry(api_key.key.clone())
            .or_insert_with(|| api_key.clone());
        Ok(())
    }
}
