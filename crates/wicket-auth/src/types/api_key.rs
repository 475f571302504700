//! API key domain type.
//!
//! API keys gate machine-to-machine callers independent of user sessions.
//! They are static credentials administered out of band.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A static machine credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    /// Unique identifier for this key record.
    pub id: Uuid,

    /// The key string presented in the `x-api-key` header.
    pub key: String,

    /// Permitted API version for this key.
    pub version: i32,

    /// Whether this key is currently accepted.
    pub enabled: bool,

    /// When this key was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ApiKey {
    /// Creates a new enabled key.
    #[must_use]
    pub fn new(key: impl Into<String>, version: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            version,
            enabled: true,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}
