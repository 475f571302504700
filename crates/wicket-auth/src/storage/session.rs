//! Session storage trait.
//!
//! # Implementation Notes
//!
//! Implementations must make [`SessionStorage::rotate`] a single atomic
//! compare-and-swap keyed on the stored secondary hash. Two concurrent
//! refreshes presenting the same refresh token must resolve to exactly one
//! winner; the loser observes a `None` result, never a lost update.
//!
//! A common approach is a conditional update:
//!
//! ```sql
//! UPDATE sessions
//! SET primary_key_hash = $3,
//!     secondary_key_hash = $4,
//!     rotated_at = NOW()
//! WHERE id = $1
//!   AND secondary_key_hash = $2
//!   AND revoked_at IS NULL
//! RETURNING *
//! ```

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::AuthResult;
use crate::types::Session;

/// Storage operations for session records.
///
/// The session manager is the only component that calls the mutating
/// methods here; read paths use [`SessionStorage::find_by_id`] only.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Persists a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be stored.
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Finds a session by id.
    ///
    /// Returns sessions regardless of revocation status; callers check
    /// `is_revoked()` themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Session>>;

    /// Atomically replaces both secret hashes if, and only if, the stored
    /// secondary hash still equals `expected_secondary_hash` and the session
    /// is not revoked.
    ///
    /// Returns the updated session on success, or `None` if the conditional
    /// update matched no row (absent, revoked, or stale secret — the caller
    /// re-fetches to diagnose which).
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage operation itself fails.
    async fn rotate(
        &self,
        id: Uuid,
        expected_secondary_hash: &str,
        new_primary_hash: &str,
        new_secondary_hash: &str,
    ) -> AuthResult<Option<Session>>;

    /// Marks a session revoked. Idempotent; revoking a revoked session is a
    /// no-op, and `Revoked` is terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn revoke(&self, id: Uuid) -> AuthResult<()>;

    /// Revokes every live session a user holds. Used when an account is
    /// disabled.
    ///
    /// Returns the number of sessions revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn revoke_all_for_user(&self, user_id: Uuid) -> AuthResult<u64>;

    /// Deletes sessions revoked before the given cutoff. Maintenance only;
    /// never on a request's critical path.
    ///
    /// Returns the number of sessions deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleanup operation fails.
    async fn cleanup_revoked(&self, before: OffsetDateTime) -> AuthResult<u64>;
}
