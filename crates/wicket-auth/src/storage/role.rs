//! Role storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::{Role, RoleCode};

/// Storage operations for the authority's role set.
///
/// The role set is small and immutable in practice; it is seeded at startup
/// and referenced by users.
#[async_trait]
pub trait RoleStorage: Send + Sync {
    /// Finds a role by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_code(&self, code: RoleCode) -> AuthResult<Option<Role>>;

    /// Lists all enabled roles.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list_enabled(&self) -> AuthResult<Vec<Role>>;

    /// Inserts a role if no record with its code exists yet. Used by the
    /// server bootstrap; idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn ensure(&self, role: &Role) -> AuthResult<()>;
}
