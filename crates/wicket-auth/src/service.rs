//! Auth service orchestration.
//!
//! Composes the token codec, session manager, authenticator, and authorizer
//! into the operations both edges expose: the local HTTP surface and the
//! message-bus delegation gateway.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::AuthResult;
use crate::authenticate::Authenticator;
use crate::authorize;
use crate::error::AuthError;
use crate::password;
use crate::session::{SessionManager, TokenPair};
use crate::storage::{ApiKeyStorage, RoleStorage, SessionStorage, UserStorage};
use crate::token::{TokenCodec, TokenError, TokenKind};
use crate::types::{ApiKey, RoleCode, Session, User, UserPrivate, UserPublic};

/// Minimum accepted password length at sign-up.
const MIN_PASSWORD_LEN: usize = 6;

// ============================================================================
// Request / response shapes
// ============================================================================

/// Sign-up request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// Display name.
    pub name: String,
    /// Email address; must be unused.
    pub email: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Optional profile picture URL.
    #[serde(default)]
    pub profile_pic_url: Option<String>,
}

/// Sign-in request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Token refresh request body. The access token rides in the
/// `Authorization` header, not here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefreshRequest {
    /// The refresh token issued with the current pair.
    pub refresh_token: String,
}

/// A signed-in user with their fresh token pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAuth {
    /// Private projection of the authenticated user.
    pub user: UserPrivate,
    /// Freshly issued tokens.
    pub tokens: AuthTokens,
}

/// Wire shape for an issued token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    /// Short-lived bearer credential.
    pub access_token: String,
    /// Long-lived, single-use refresh credential.
    pub refresh_token: String,
}

impl From<TokenPair> for AuthTokens {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

// ============================================================================
// Service
// ============================================================================

/// The authority's application service.
pub struct AuthService {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserStorage>,
    roles: Arc<dyn RoleStorage>,
    api_keys: Arc<dyn ApiKeyStorage>,
    sessions: SessionManager,
    authenticator: Authenticator,
}

impl AuthService {
    /// Wires up the service from its storage backends and token codec.
    pub fn new(
        codec: Arc<TokenCodec>,
        users: Arc<dyn UserStorage>,
        roles: Arc<dyn RoleStorage>,
        session_storage: Arc<dyn SessionStorage>,
        api_keys: Arc<dyn ApiKeyStorage>,
    ) -> Self {
        let sessions = SessionManager::new(Arc::clone(&session_storage), Arc::clone(&codec));
        let authenticator = Authenticator::new(
            Arc::clone(&codec),
            session_storage,
            Arc::clone(&users),
        );
        Self {
            codec,
            users,
            roles,
            api_keys,
            sessions,
            authenticator,
        }
    }

    /// Creates a user with the default `LEARNER` role and opens their first
    /// session.
    ///
    /// # Errors
    ///
    /// `BadRequest` for invalid input or an already registered email.
    pub async fn sign_up_basic(&self, request: SignUpRequest) -> AuthResult<UserAuth> {
        validate_sign_up(&request)?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AuthError::bad_request("email already registered"));
        }

        let learner = self
            .roles
            .find_by_code(RoleCode::Learner)
            .await?
            .ok_or_else(|| AuthError::internal("default LEARNER role is not seeded"))?;

        let now = time::OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email: request.email,
            password_hash: password::hash_password(&request.password)?,
            profile_pic_url: request.profile_pic_url,
            roles: vec![learner],
            enabled: true,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        info!(user_id = %user.id, "user signed up");

        let (_, pair) = self.sessions.open(user.id).await?;
        Ok(UserAuth {
            user: UserPrivate::from(&user),
            tokens: pair.into(),
        })
    }

    /// Verifies credentials and opens a new session for the device.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` for unknown email, wrong password, or a disabled
    /// account — indistinguishable by design.
    pub async fn sign_in_basic(&self, request: SignInRequest) -> AuthResult<UserAuth> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !user.enabled {
            return Err(invalid_credentials());
        }
        if !password::verify_password(&request.password, &user.password_hash)? {
            return Err(invalid_credentials());
        }

        let (_, pair) = self.sessions.open(user.id).await?;
        info!(user_id = %user.id, "user signed in");
        Ok(UserAuth {
            user: UserPrivate::from(&user),
            tokens: pair.into(),
        })
    }

    /// Exchanges a spent refresh token for a fresh pair.
    ///
    /// The access token (possibly expired, but signature-valid) identifies
    /// the session; the refresh token is the single-use secret consumed by
    /// the rotation.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` for bad tokens or a mismatched pair;
    /// `SessionNotFound` / `SessionRevoked` / `RefreshMismatch` from the
    /// rotation itself.
    pub async fn renew_token(
        &self,
        access_token: &str,
        request: TokenRefreshRequest,
    ) -> AuthResult<AuthTokens> {
        let access = self
            .codec
            .verify_ignoring_expiry(access_token)
            .map_err(|_| AuthError::unauthenticated("invalid access token"))?;
        if access.typ != TokenKind::Access {
            return Err(AuthError::unauthenticated("not an access token"));
        }

        let refresh = self
            .codec
            .verify(&request.refresh_token)
            .map_err(|e| match e {
                TokenError::Expired => AuthError::unauthenticated("refresh token expired"),
                _ => AuthError::unauthenticated("invalid refresh token"),
            })?;
        if refresh.typ != TokenKind::Refresh {
            return Err(AuthError::unauthenticated("not a refresh token"));
        }

        if access.sid != refresh.sid || access.sub != refresh.sub {
            return Err(AuthError::unauthenticated("token pair mismatch"));
        }

        let presented_hash = Session::hash_key(&request.refresh_token);
        let (_, pair) = self
            .sessions
            .rotate(refresh.sid, refresh.sub, &presented_hash)
            .await?;
        Ok(pair.into())
    }

    /// Revokes the authenticated device's session. Other sessions of the
    /// same user are untouched.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the revocation write fails.
    pub async fn sign_out(&self, session: &Session) -> AuthResult<()> {
        self.sessions.revoke(session.id).await
    }

    /// Checks a machine caller's API key.
    ///
    /// # Errors
    ///
    /// `Forbidden` for an unknown or disabled key.
    pub async fn verify_api_key(&self, key: &str) -> AuthResult<ApiKey> {
        let api_key = self
            .api_keys
            .find_by_key(key)
            .await?
            .filter(|k| k.enabled)
            .ok_or_else(|| AuthError::forbidden("permission denied: invalid x-api-key"))?;
        Ok(api_key)
    }

    /// Resolves a bearer `Authorization` header to its user and session.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` per the authenticator's contract.
    pub async fn authenticate(&self, header: &str) -> AuthResult<(User, Session)> {
        self.authenticator.authenticate(header).await
    }

    /// Resolves a raw access token, as presented over the message bus.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` per the authenticator's contract.
    pub async fn authenticate_token(&self, token: &str) -> AuthResult<(User, Session)> {
        self.authenticator.authenticate_token(token).await
    }

    /// Checks the user's current roles against a requirement.
    ///
    /// # Errors
    ///
    /// `Forbidden` per the authorizer's policy.
    pub fn authorize(&self, user: &User, required: &[RoleCode]) -> AuthResult<()> {
        authorize::authorize(user, required)
    }

    /// Loads a fresh copy of a user and checks a wire-form role requirement
    /// against it. Used by the bus gateway, where the caller's copy of the
    /// user may be stale.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown or disabled user; `Forbidden` per the
    /// authorizer's policy.
    pub async fn authorize_user_id(
        &self,
        user_id: Uuid,
        required: &[String],
    ) -> AuthResult<User> {
        let user = self.fetch_enabled_user(user_id).await?;
        authorize::authorize_codes(&user, required)?;
        Ok(user)
    }

    /// Loads an enabled user by id. Used by the bus gateway, whose replies
    /// carry the full user shape.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown or disabled user.
    pub async fn find_user(&self, user_id: Uuid) -> AuthResult<User> {
        self.fetch_enabled_user(user_id).await
    }

    /// Public profile lookup. Profile data is intentionally public; no
    /// authorization side effects.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown or disabled user.
    pub async fn find_public_profile(&self, user_id: Uuid) -> AuthResult<UserPublic> {
        let user = self.fetch_enabled_user(user_id).await?;
        Ok(UserPublic::from(&user))
    }

    /// Private profile of the authenticated user.
    #[must_use]
    pub fn private_profile(&self, user: &User) -> UserPrivate {
        UserPrivate::from(user)
    }

    /// Disables an account and revokes every session it holds.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist.
    pub async fn disable_user(&self, user_id: Uuid) -> AuthResult<u64> {
        self.users.set_enabled(user_id, false).await?;
        self.sessions.revoke_all_for_user(user_id).await
    }

    async fn fetch_enabled_user(&self, user_id: Uuid) -> AuthResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .filter(|u| u.enabled)
            .ok_or_else(|| AuthError::not_found("user not found"))
    }
}

fn invalid_credentials() -> AuthError {
    AuthError::unauthenticated("invalid email or password")
}

fn validate_sign_up(request: &SignUpRequest) -> AuthResult<()> {
    if request.name.trim().is_empty() {
        return Err(AuthError::bad_request("name must not be empty"));
    }
    if !request.email.contains('@') {
        return Err(AuthError::bad_request("email is not valid"));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::bad_request(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(name: &str, email: &str, password: &str) -> SignUpRequest {
        SignUpRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            profile_pic_url: None,
        }
    }

    #[test]
    fn test_validate_sign_up() {
        assert!(validate_sign_up(&sign_up("Alice", "alice@example.com", "changeme")).is_ok());
        assert!(validate_sign_up(&sign_up("", "alice@example.com", "changeme")).is_err());
        assert!(validate_sign_up(&sign_up("Alice", "not-an-email", "changeme")).is_err());
        assert!(validate_sign_up(&sign_up("Alice", "alice@example.com", "short")).is_err());
    }
}
