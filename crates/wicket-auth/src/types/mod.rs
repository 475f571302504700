//! Domain types for the identity authority.

pub mod api_key;
pub mod role;
pub mod session;
pub mod user;

pub use api_key::ApiKey;
pub use role::{Role, RoleCode};
pub use session::Session;
pub use user::{User, UserPrivate, UserPublic};
