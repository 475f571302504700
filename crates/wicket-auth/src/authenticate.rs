//! Bearer token authentication.
//!
//! The primary read path: resolve a bearer token to a live session and its
//! owning user. Every failure is `Unauthenticated` and terminal for the
//! request — there are no retries here.

use std::sync::Arc;

use tracing::debug;

use crate::AuthResult;
use crate::error::AuthError;
use crate::storage::{SessionStorage, UserStorage};
use crate::token::{TokenCodec, TokenError, TokenKind};
use crate::types::{Session, User};

/// Scheme prefix for the `Authorization` header.
const BEARER_PREFIX: &str = "Bearer ";

/// Resolves bearer tokens to users and sessions.
pub struct Authenticator {
    codec: Arc<TokenCodec>,
    sessions: Arc<dyn SessionStorage>,
    users: Arc<dyn UserStorage>,
}

impl Authenticator {
    /// Creates a new authenticator.
    pub fn new(
        codec: Arc<TokenCodec>,
        sessions: Arc<dyn SessionStorage>,
        users: Arc<dyn UserStorage>,
    ) -> Self {
        Self {
            codec,
            sessions,
            users,
        }
    }

    /// Authenticates an `Authorization` header value of the form
    /// `Bearer <token>`.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` for a missing or malformed header, or any failure
    /// of [`Authenticator::authenticate_token`].
    pub async fn authenticate(&self, header: &str) -> AuthResult<(User, Session)> {
        let token = extract_bearer_token(header)
            .ok_or_else(|| AuthError::unauthenticated("missing or malformed bearer token"))?;
        self.authenticate_token(token).await
    }

    /// Authenticates a raw access token, as presented over the message bus.
    ///
    /// Steps: verify signature and expiry, load the session, reject revoked
    /// sessions, confirm the session owner matches the token subject, confirm
    /// the token is the session's live access token, load the user, reject
    /// disabled accounts.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` for every failure mode; the message distinguishes
    /// expiry so clients can trigger a refresh.
    pub async fn authenticate_token(&self, token: &str) -> AuthResult<(User, Session)> {
        let claims = self.codec.verify(token).map_err(|e| match e {
            TokenError::Expired => AuthError::unauthenticated("token expired"),
            _ => AuthError::unauthenticated("invalid token"),
        })?;

        if claims.typ != TokenKind::Access {
            return Err(AuthError::unauthenticated("not an access token"));
        }

        let session = self
            .sessions
            .find_by_id(claims.sid)
            .await?
            .ok_or_else(|| AuthError::unauthenticated("session not found"))?;

        if session.is_revoked() {
            debug!(session_id = %session.id, "rejected token for revoked session");
            return Err(AuthError::unauthenticated("session revoked"));
        }

        // A signed token whose subject does not own its session can only be
        // the product of tampering or a cross-environment key reuse.
        if session.user_id != claims.sub {
            return Err(AuthError::unauthenticated("session owner mismatch"));
        }

        // Rotation replaces the stored access hash; an earlier access token
        // is dead from that point on, expiry notwithstanding.
        if session.primary_key_hash != Session::hash_key(token) {
            debug!(session_id = %session.id, "rejected superseded access token");
            return Err(AuthError::unauthenticated("access token superseded"));
        }

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AuthError::unauthenticated("user not found"))?;

        if !user.enabled {
            return Err(AuthError::unauthenticated("user disabled"));
        }

        Ok((user, session))
    }
}

/// Extracts the token from a `Bearer <token>` header value.
#[must_use]
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token(""), None);
        assert_eq!(extract_bearer_token("bearer abc"), None);
    }
}
