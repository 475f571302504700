//! Session lifecycle management.
//!
//! The session manager is the sole writer of session records: it opens a
//! session per authenticated device, rotates its secrets on refresh, and
//! revokes it on sign-out or on a theft signal.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::AuthResult;
use crate::error::AuthError;
use crate::storage::SessionStorage;
use crate::token::{TokenCodec, TokenError, TokenKind};
use crate::types::Session;

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Short-lived bearer credential.
    pub access_token: String,
    /// Long-lived, single-use refresh credential.
    pub refresh_token: String,
}

/// Owns the lifecycle of session records.
pub struct SessionManager {
    sessions: Arc<dyn SessionStorage>,
    codec: Arc<TokenCodec>,
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(sessions: Arc<dyn SessionStorage>, codec: Arc<TokenCodec>) -> Self {
        Self { sessions, codec }
    }

    /// Opens a new session for a user and issues its first token pair.
    ///
    /// Side effect: one new persisted session row.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the session cannot be persisted.
    pub async fn open(&self, user_id: Uuid) -> AuthResult<(Session, TokenPair)> {
        let session_id = Uuid::new_v4();
        let pair = self.issue_pair(user_id, session_id)?;

        let session = Session::open(
            session_id,
            user_id,
            Session::hash_key(&pair.access_token),
            Session::hash_key(&pair.refresh_token),
        );
        self.sessions.create(&session).await?;

        info!(user_id = %user_id, session_id = %session_id, "session opened");
        Ok((session, pair))
    }

    /// Rotates a session's secrets, consuming the presented refresh secret.
    ///
    /// The swap is a single conditional write keyed on the stored secondary
    /// hash: of two concurrent refreshes presenting the same token, exactly
    /// one wins. The loser's stale secret is treated as a theft signal — the
    /// session is revoked before `RefreshMismatch` is returned.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if no session with this id exists
    /// - `SessionRevoked` if the session is revoked
    /// - `Unauthenticated` if the session is not owned by `user_id`
    /// - `RefreshMismatch` if the presented secret has already been consumed
    pub async fn rotate(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        presented_secondary_hash: &str,
    ) -> AuthResult<(Session, TokenPair)> {
        let current = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if current.is_revoked() {
            return Err(AuthError::SessionRevoked);
        }
        if current.user_id != user_id {
            return Err(AuthError::unauthenticated("session owner mismatch"));
        }

        let pair = self.issue_pair(user_id, session_id)?;
        let rotated = self
            .sessions
            .rotate(
                session_id,
                presented_secondary_hash,
                &Session::hash_key(&pair.access_token),
                &Session::hash_key(&pair.refresh_token),
            )
            .await?;

        match rotated {
            Some(session) => {
                info!(user_id = %user_id, session_id = %session_id, "session rotated");
                Ok((session, pair))
            }
            None => self.diagnose_failed_rotate(session_id).await,
        }
    }

    /// Marks a session revoked. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub async fn revoke(&self, session_id: Uuid) -> AuthResult<()> {
        self.sessions.revoke(session_id).await?;
        info!(session_id = %session_id, "session revoked");
        Ok(())
    }

    /// Revokes every live session a user holds.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> AuthResult<u64> {
        let revoked = self.sessions.revoke_all_for_user(user_id).await?;
        info!(user_id = %user_id, revoked, "revoked all sessions for user");
        Ok(revoked)
    }

    /// Explains a conditional update that matched no row, revoking the
    /// session when the cause is a consumed secret.
    async fn diagnose_failed_rotate(&self, session_id: Uuid) -> AuthResult<(Session, TokenPair)> {
        match self.sessions.find_by_id(session_id).await? {
            None => Err(AuthError::SessionNotFound),
            Some(session) if session.is_revoked() => Err(AuthError::SessionRevoked),
            Some(_) => {
                // A live session with a non-matching secondary hash means the
                // presented refresh token was already consumed: replay or a
                // lost race. Either way the token has leaked its single use.
                warn!(
                    session_id = %session_id,
                    "refresh secret replayed; revoking session"
                );
                self.sessions.revoke(session_id).await?;
                Err(AuthError::RefreshMismatch)
            }
        }
    }

    fn issue_pair(&self, user_id: Uuid, session_id: Uuid) -> AuthResult<TokenPair> {
        let access_token = self
            .codec
            .issue(user_id, session_id, TokenKind::Access)
            .map_err(issue_error)?;
        let refresh_token = self
            .codec
            .issue(user_id, session_id, TokenKind::Refresh)
            .map_err(issue_error)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

fn issue_error(err: TokenError) -> AuthError {
    AuthError::internal(format!("token issuance failed: {err}"))
}
