//! First-startup seeding.
//!
//! The role set is required for sign-up (every new account gets `LEARNER`),
//! so it is seeded unconditionally. The API key is seeded only when
//! configured. Both writes are idempotent, so running the bootstrap on
//! every startup is safe.

use std::sync::Arc;

use tracing::info;

use wicket_auth::storage::{ApiKeyStorage, RoleStorage};
use wicket_auth::types::{ApiKey, Role, RoleCode};

use crate::config::BootstrapConfig;

/// Seeds default roles and the configured API key.
///
/// # Errors
///
/// Returns the first storage error encountered.
pub async fn run(
    roles: &Arc<dyn RoleStorage>,
    api_keys: &Arc<dyn ApiKeyStorage>,
    config: &BootstrapConfig,
) -> wicket_auth::AuthResult<()> {
    for code in RoleCode::ALL {
        roles.ensure(&Role::new(code)).await?;
    }
    info!(count = RoleCode::ALL.len(), "default roles seeded");

    if let Some(key) = &config.api_key {
        api_keys.ensure(&ApiKey::new(key.clone(), 1)).await?;
        info!("bootstrap api key seeded");
    }

    Ok(())
}
