//! HTTP rendering of authentication errors.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::AuthError;
use crate::http::envelope::ErrorEnvelope;

/// Maps an error to the status code its kind deserves.
fn status_for(error: &AuthError) -> StatusCode {
    match error {
        AuthError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AuthError::Unauthenticated { .. }
        | AuthError::SessionNotFound
        | AuthError::SessionRevoked
        | AuthError::RefreshMismatch => StatusCode::UNAUTHORIZED,
        AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AuthError::NotFound { .. } => StatusCode::NOT_FOUND,
        AuthError::DependencyUnavailable { .. } | AuthError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = status_for(&self);

        // Server-side faults get logged with their real cause; the client
        // sees a generic message.
        let message = if self.is_server_error() {
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let mut response = (status, Json(ErrorEnvelope { message })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}
