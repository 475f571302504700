//! User storage trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::AuthResult;
use crate::types::User;

/// Storage operations for user records.
///
/// Implementations are provided for:
/// - PostgreSQL (`wicket-auth-postgres`)
/// - In-memory (`wicket-auth-memory`, tests and standalone mode)
///
/// Users are never hard-deleted; `set_enabled(false)` is the terminal
/// operation for an account.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Persists a new user.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if the email is already registered, or a storage
    /// error if the write fails.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Finds a user by id, with roles resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>>;

    /// Finds a user by email, with roles resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Enables or disables a user account (soft delete).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist, or a storage error if
    /// the write fails.
    async fn set_enabled(&self, id: Uuid, enabled: bool) -> AuthResult<()>;
}
