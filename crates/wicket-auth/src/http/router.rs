//! Route table for the auth HTTP surface.

use axum::Router;
use axum::routing::{delete, get, post};

use crate::http::extractor::AuthState;
use crate::http::handlers;

/// Builds the auth router over the given state.
///
/// Routes mirror the authority's public surface: credential endpoints,
/// token lifecycle, API-key verification, and the profile lookups.
pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/signup/basic", post(handlers::sign_up_basic))
        .route("/signin/basic", post(handlers::sign_in_basic))
        .route("/token/refresh", post(handlers::refresh_token))
        .route("/signout", delete(handlers::sign_out))
        .route("/verify/apikey", get(handlers::verify_api_key))
        .route("/profile/id/{id}", get(handlers::public_profile))
        .route("/profile/mine", get(handlers::my_profile))
        .with_state(state)
}
