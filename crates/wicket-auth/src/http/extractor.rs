//! Axum extractors for authenticated requests.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;

use crate::error::AuthError;
use crate::service::AuthService;
use crate::types::{Session, User};

/// Shared state for the auth router.
#[derive(Clone)]
pub struct AuthState {
    /// The application service behind every handler.
    pub service: Arc<AuthService>,
}

impl AuthState {
    /// Creates router state around a service.
    #[must_use]
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }
}

/// The resolved identity of a bearer-authenticated request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user with their current roles.
    pub user: User,
    /// The live session the presented token belongs to.
    pub session: Session,
}

/// Extractor that authenticates the `Authorization: Bearer` header.
///
/// Rejects with `401` before the handler runs when the header is missing,
/// the token is invalid or expired, the session is revoked, or the user is
/// disabled.
pub struct BearerUser(pub AuthContext);

impl<S> FromRequestParts<S> for BearerUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);

        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AuthError::unauthenticated("missing or malformed bearer token"))?;

        let (user, session) = auth.service.authenticate(header).await?;
        Ok(Self(AuthContext { user, session }))
    }
}
