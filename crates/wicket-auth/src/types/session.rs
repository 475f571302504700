//! Session ("keystore") domain type.
//!
//! A session tracks one authenticated device's live credentials. The access
//! and refresh tokens themselves are never stored; the session keeps SHA-256
//! hashes of both so that rotation can be a conditional update keyed on the
//! stored refresh hash and a replayed token can be recognized.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Server-side record for one authenticated device.
///
/// State machine: `Active --rotate--> Active (new secrets)`;
/// `Active --revoke--> Revoked`; `Revoked` is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier; embedded in both tokens as `sid`.
    pub id: Uuid,

    /// Owning user.
    pub user_id: Uuid,

    /// SHA-256 hash of the currently live access token.
    pub primary_key_hash: String,

    /// SHA-256 hash of the currently live refresh token. Single-use:
    /// replaced atomically on every successful rotation.
    pub secondary_key_hash: String,

    /// When this session was opened.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the secrets were last rotated.
    #[serde(with = "time::serde::rfc3339")]
    pub rotated_at: OffsetDateTime,

    /// When this session was revoked (None = live). Revocation is terminal;
    /// rows are kept for audit and garbage-collected out of band.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub revoked_at: Option<OffsetDateTime>,
}

impl Session {
    /// Opens a new session for a user, binding it to the given token hashes.
    ///
    /// The id is allocated by the caller because it must be embedded in the
    /// tokens before their hashes exist.
    #[must_use]
    pub fn open(
        id: Uuid,
        user_id: Uuid,
        primary_key_hash: String,
        secondary_key_hash: String,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id,
            user_id,
            primary_key_hash,
            secondary_key_hash,
            created_at: now,
            rotated_at: now,
            revoked_at: None,
        }
    }

    /// Returns `true` if this session has been revoked.
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Hashes token material for storage or comparison.
    ///
    /// Used both when binding fresh tokens to a session and when matching a
    /// presented token against the stored hash.
    #[must_use]
    pub fn hash_key(token: &str) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_is_live() {
        let session = Session::open(Uuid::new_v4(), Uuid::new_v4(), "p".into(), "s".into());
        assert!(!session.is_revoked());
        assert_eq!(session.created_at, session.rotated_at);
    }

    #[test]
    fn test_hash_key_is_stable_and_hex() {
        let hash = Session::hash_key("some-token-text");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, Session::hash_key("some-token-text"));
        assert_ne!(hash, Session::hash_key("other-token-text"));
    }

    #[test]
    fn test_revoked_at_roundtrip() {
        let mut session = Session::open(Uuid::new_v4(), Uuid::new_v4(), "p".into(), "s".into());
        session.revoked_at = Some(OffsetDateTime::now_utc());

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert!(back.is_revoked());
    }
}
