//! Response envelopes for the HTTP surface.
//!
//! Success responses carry a message and an optional data payload; error
//! responses carry a message only. The HTTP status, not the body, encodes
//! the error kind.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T: Serialize> {
    /// Human-readable outcome message.
    pub message: String,
    /// Optional payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    /// Human-readable failure message.
    pub message: String,
}

/// A `200 OK` with a message and payload.
pub fn success_data<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    Json(SuccessEnvelope {
        message: message.into(),
        data: Some(data),
    })
    .into_response()
}

/// A `200 OK` with a message only.
pub fn success_message(message: impl Into<String>) -> Response {
    Json(SuccessEnvelope::<()> {
        message: message.into(),
        data: None,
    })
    .into_response()
}
