//! # wicket-auth
//!
//! Authentication and authorization core for the Wicket platform.
//!
//! This crate provides:
//! - Credential verification and account sign-up
//! - JWT access/refresh token issuance and validation
//! - Per-device sessions with single-use refresh rotation
//! - Role-based authorization against current role assignments
//! - API key verification for machine callers
//! - Axum handlers for the authority's HTTP surface
//!
//! ## Overview
//!
//! The core is storage-agnostic: every persistence concern sits behind a
//! trait in [`storage`], with in-memory and Postgres backends in sibling
//! crates. Peer services delegate auth decisions to this core over the
//! message bus instead of sharing the signing secret.
//!
//! ## Modules
//!
//! - [`config`] - Token issuance configuration
//! - [`error`] - Error kinds crossing the core's boundary
//! - [`types`] - Users, roles, sessions, API keys and their projections
//! - [`token`] - JWT encode/verify
//! - [`storage`] - Persistence traits
//! - [`session`] - Session lifecycle and refresh rotation
//! - [`authenticate`] - Bearer token resolution
//! - [`authorize`] - Role gate
//! - [`password`] - Argon2 password hashing
//! - [`service`] - Application service composing the above
//! - [`http`] - Axum HTTP surface

pub mod authenticate;
pub mod authorize;
pub mod config;
pub mod error;
pub mod http;
pub mod password;
pub mod service;
pub mod session;
pub mod storage;
pub mod token;
pub mod types;

pub use authenticate::{Authenticator, extract_bearer_token};
pub use authorize::{authorize, authorize_codes, parse_role_codes};
pub use config::AuthConfig;
pub use error::{AuthError, ErrorCategory};
pub use http::{AuthContext, AuthState, BearerUser, router};
pub use service::{
    AuthService, AuthTokens, SignInRequest, SignUpRequest, TokenRefreshRequest, UserAuth,
};
pub use session::{SessionManager, TokenPair};
pub use storage::{ApiKeyStorage, RoleStorage, SessionStorage, UserStorage};
pub use token::{TokenClaims, TokenCodec, TokenError, TokenKind};
pub use types::{ApiKey, Role, RoleCode, Session, User, UserPrivate, UserPublic};

/// Type alias for authentication/authorization results.
pub type AuthResult<T> = Result<T, AuthError>;
