//! # wicket-server
//!
//! The Wicket identity authority binary: wires storage backends, the auth
//! core, the HTTP surface, and the bus delegation gateway together.

pub mod bootstrap;
pub mod config;
pub mod observability;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use wicket_auth::http::AuthState;
use wicket_auth::service::AuthService;
use wicket_auth::storage::{ApiKeyStorage, RoleStorage, SessionStorage, UserStorage};
use wicket_auth::token::TokenCodec;
use wicket_auth_memory::MemoryBackends;
use wicket_auth_postgres::PostgresAuthStorage;

use crate::config::AppConfig;

/// The four storage backends behind the auth core, whichever engine backs
/// them.
#[derive(Clone)]
pub struct Backends {
    /// User store.
    pub users: Arc<dyn UserStorage>,
    /// Role store.
    pub roles: Arc<dyn RoleStorage>,
    /// Session store.
    pub sessions: Arc<dyn SessionStorage>,
    /// API key store.
    pub api_keys: Arc<dyn ApiKeyStorage>,
}

/// Connects the storage backends the configuration selects.
///
/// A configured Postgres URL selects the persistent backend (creating the
/// schema if needed); otherwise the server runs on in-memory stores.
///
/// # Errors
///
/// Returns an error if the Postgres connection or schema bootstrap fails.
pub async fn connect_backends(config: &AppConfig) -> anyhow::Result<Backends> {
    match &config.storage.postgres {
        Some(pg) => {
            let storage = PostgresAuthStorage::connect(&pg.url).await?;
            storage.ensure_schema().await?;
            info!("connected to postgres storage");
            Ok(Backends {
                users: storage.users(),
                roles: storage.roles(),
                sessions: storage.sessions(),
                api_keys: storage.api_keys(),
            })
        }
        None => {
            info!("no postgres configured; using in-memory storage");
            let memory = MemoryBackends::seeded().await;
            Ok(Backends {
                users: memory.users,
                roles: memory.roles,
                sessions: memory.sessions,
                api_keys: memory.api_keys,
            })
        }
    }
}

/// Wires the auth service over the given backends.
#[must_use]
pub fn build_service(config: &AppConfig, backends: &Backends) -> Arc<AuthService> {
    Arc::new(AuthService::new(
        Arc::new(TokenCodec::new(&config.auth)),
        Arc::clone(&backends.users),
        Arc::clone(&backends.roles),
        Arc::clone(&backends.sessions),
        Arc::clone(&backends.api_keys),
    ))
}

/// Builds the full application router: auth routes plus health check,
/// request tracing, and CORS.
#[must_use]
pub fn app(service: Arc<AuthService>) -> Router {
    wicket_auth::http::router(AuthState::new(service))
        .route("/healthz", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
