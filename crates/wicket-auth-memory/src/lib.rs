//! # wicket-auth-memory
//!
//! In-memory storage backends for the Wicket auth core. Used by tests and
//! by the server's standalone mode; state lives only as long as the
//! process.
//!
//! Each backend is a `tokio::sync::RwLock` over a `HashMap`. Session
//! rotation performs its compare-and-swap under the write lock, matching
//! the atomicity of the Postgres backend's conditional update.

pub mod api_key;
pub mod role;
pub mod session;
pub mod user;

pub use api_key::MemoryApiKeyStorage;
pub use role::MemoryRoleStorage;
pub use session::MemorySessionStorage;
pub use user::MemoryUserStorage;

use std::sync::Arc;

use wicket_auth::AuthConfig;
use wicket_auth::service::AuthService;
use wicket_auth::token::TokenCodec;

/// The four in-memory backends as trait objects, ready for wiring.
#[derive(Clone)]
pub struct MemoryBackends {
    /// User store.
    pub users: Arc<MemoryUserStorage>,
    /// Role store, seeded with the default role set.
    pub roles: Arc<MemoryRoleStorage>,
    /// Session store.
    pub sessions: Arc<MemorySessionStorage>,
    /// API key store.
    pub api_keys: Arc<MemoryApiKeyStorage>,
}

impl MemoryBackends {
    /// Creates fresh backends with the default role set seeded.
    pub async fn seeded() -> Self {
        Self {
            users: Arc::new(MemoryUserStorage::new()),
            roles: Arc::new(MemoryRoleStorage::seeded().await),
            sessions: Arc::new(MemorySessionStorage::new()),
            api_keys: Arc::new(MemoryApiKeyStorage::new()),
        }
    }

    /// Wires an [`AuthService`] over these backends.
    #[must_use]
    pub fn service(&self, config: &AuthConfig) -> AuthService {
        AuthService::new(
            Arc::new(TokenCodec::new(config)),
            self.users.clone(),
            self.roles.clone(),
            self.sessions.clone(),
            self.api_keys.clone(),
        )
    }
}

/// Builds a fully wired [`AuthService`] over fresh in-memory backends with
/// the default role set seeded. Convenient for tests and standalone mode.
pub async fn memory_auth_service(config: &AuthConfig) -> AuthService {
    MemoryBackends::seeded().await.service(config)
}
