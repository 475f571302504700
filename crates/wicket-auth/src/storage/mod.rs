//! Storage traits for the identity authority.
//!
//! Pure data access, no policy: every decision (revocation, role
//! intersection, theft detection) lives above this layer. Backends are
//! provided by `wicket-auth-postgres` and `wicket-auth-memory`.

pub mod api_key;
pub mod role;
pub mod session;
pub mod user;

pub use api_key::ApiKeyStorage;
pub use role::RoleStorage;
pub use session::SessionStorage;
pub use user::UserStorage;
