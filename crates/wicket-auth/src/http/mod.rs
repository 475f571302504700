//! HTTP surface of the auth authority.
//!
//! Thin axum layer over [`crate::service::AuthService`]: envelopes, error
//! rendering, the bearer extractor, handlers, and the route table.

pub mod envelope;
pub mod error;
pub mod extractor;
pub mod handlers;
pub mod router;

pub use extractor::{AuthContext, AuthState, BearerUser};
pub use router::router;
