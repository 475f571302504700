//! Request handlers for the auth HTTP surface.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::Response;
use tracing::debug;
use uuid::Uuid;

use crate::authenticate::extract_bearer_token;
use crate::error::AuthError;
use crate::http::envelope::{success_data, success_message};
use crate::http::extractor::{AuthState, BearerUser};
use crate::service::{SignInRequest, SignUpRequest, TokenRefreshRequest};

/// Header carrying the machine caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

type HandlerResult = Result<Response, AuthError>;

/// `POST /signup/basic`
pub async fn sign_up_basic(
    State(state): State<AuthState>,
    body: Result<Json<SignUpRequest>, JsonRejection>,
) -> HandlerResult {
    let Json(request) = body.map_err(bad_body)?;
    let auth = state.service.sign_up_basic(request).await?;
    Ok(success_data("signup success", auth))
}

/// `POST /signin/basic`
pub async fn sign_in_basic(
    State(state): State<AuthState>,
    body: Result<Json<SignInRequest>, JsonRejection>,
) -> HandlerResult {
    let Json(request) = body.map_err(bad_body)?;
    let auth = state.service.sign_in_basic(request).await?;
    Ok(success_data("signin success", auth))
}

/// `POST /token/refresh`
///
/// The (possibly expired) access token rides in the `Authorization` header;
/// the refresh token is in the body.
pub async fn refresh_token(
    State(state): State<AuthState>,
    headers: HeaderMap,
    body: Result<Json<TokenRefreshRequest>, JsonRejection>,
) -> HandlerResult {
    let Json(request) = body.map_err(bad_body)?;
    let access_token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| AuthError::unauthenticated("missing or malformed bearer token"))?;

    let tokens = state.service.renew_token(access_token, request).await?;
    Ok(success_data("token issued", tokens))
}

/// `DELETE /signout`
pub async fn sign_out(
    State(state): State<AuthState>,
    BearerUser(ctx): BearerUser,
) -> HandlerResult {
    state.service.sign_out(&ctx.session).await?;
    debug!(session_id = %ctx.session.id, "session signed out");
    Ok(success_message("signout success"))
}

/// `GET /verify/apikey`
pub async fn verify_api_key(State(state): State<AuthState>, headers: HeaderMap) -> HandlerResult {
    let key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AuthError::unauthenticated("permission denied: missing x-api-key"))?;

    state.service.verify_api_key(key).await?;
    Ok(success_message("success"))
}

/// `GET /profile/id/{id}` — public projection, no authentication.
pub async fn public_profile(
    State(state): State<AuthState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let Path(user_id) = id.map_err(|_| AuthError::bad_request("invalid user id"))?;
    let profile = state.service.find_public_profile(user_id).await?;
    Ok(success_data("success", profile))
}

/// `GET /profile/mine` — private projection of the authenticated user.
pub async fn my_profile(
    State(state): State<AuthState>,
    BearerUser(ctx): BearerUser,
) -> HandlerResult {
    let profile = state.service.private_profile(&ctx.user);
    Ok(success_data("success", profile))
}

fn bad_body(rejection: JsonRejection) -> AuthError {
    AuthError::bad_request(rejection.body_text())
}
