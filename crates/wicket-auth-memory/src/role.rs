//! In-memory role storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use wicket_auth::AuthResult;
use wicket_auth::storage::RoleStorage;
use wicket_auth::types::{Role, RoleCode};

/// Role backend over a `RwLock<HashMap>` keyed by code.
#[derive(Debug, Default)]
pub struct MemoryRoleStorage {
    roles: Arc<RwLock<HashMap<RoleCode, Role>>>,
}

impl MemoryRoleStorage {
    /// Creates an empty role store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with every known role, enabled.
    pub async fn seeded() -> Self {
        let storage = Self::new();
        for code in RoleCode::ALL {
            // ensure() on a fresh store cannot fail
            let _ = storage.ensure(&Role::new(code)).await;
        }
        storage
    }
}

#[async_trait]
impl RoleStorage for MemoryRoleStorage {
    async fn find_by_code(&self, code: RoleCode) -> AuthResult<Option<Role>> {
        Ok(self.roles.read().await.get(&code).cloned())
    }

    async fn list_enabled(&self) -> AuthResult<Vec<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .values()
            .filter(|r| r.enabled)
            .cloned()
            .collect())
    }

    async fn ensure(&self, role: &Role) -> AuthResult<()> {
        self.roles
            .write()
            .await
            .entry(role.code)
            .or_insert_with(|| role.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_has_all_roles() {
        let storage = MemoryRoleStorage::seeded().await;
        for code in RoleCode::ALL {
            assert!(storage.find_by_code(code).await.unwrap().is_some());
        }
        assert_eq!(storage.list_enabled().await.unwrap().len(), RoleCode::ALL.len());
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let storage = MemoryRoleStorage::new();
        let first = Role::new(RoleCode::Admin);
        storage.ensure(&first).await.unwrap();
        storage.ensure(&Role::new(RoleCode::Admin)).await.unwrap();

        let stored = storage.find_by_code(RoleCode::Admin).await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
    }
}
