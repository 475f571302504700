//! Authentication core configuration.
//!
//! Consumed, not produced, by this crate: the server binary loads these
//! values from its configuration file and environment and hands them to the
//! token codec and session manager.
//!
//! # Example (TOML)
//!
//! ```toml
//! [auth]
//! issuer = "wicket-authority"
//! signing_secret = "change-me-in-production"
//! access_token_lifetime = "15m"
//! refresh_token_lifetime = "30d"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for token issuance and verification.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Value of the `iss` claim on issued tokens; verification rejects
    /// tokens from other issuers.
    pub issuer: String,

    /// HMAC signing secret for the token codec. Process-wide, rotated out
    /// of band.
    pub signing_secret: String,

    /// Access token lifetime. Short; expiry triggers the refresh flow.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime. Long; refresh tokens are single-use per
    /// rotation regardless of remaining lifetime.
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "wicket-authority".to_string(),
            signing_secret: String::new(),
            access_token_lifetime: Duration::from_secs(15 * 60),
            refresh_token_lifetime: Duration::from_secs(30 * 24 * 60 * 60),
        }
    }
}

impl AuthConfig {
    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.signing_secret.len() < 16 {
            return Err("auth.signing_secret must be at least 16 bytes".to_string());
        }
        if self.access_token_lifetime >= self.refresh_token_lifetime {
            return Err(
                "auth.access_token_lifetime must be shorter than refresh_token_lifetime"
                    .to_string(),
            );
        }
        Ok(())
    }
}
