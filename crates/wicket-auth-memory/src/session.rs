//! In-memory session storage.
//!
//! Rotation holds the write lock across the compare and the swap, which
//! gives the same exactly-one-winner guarantee as the Postgres backend's
//! conditional UPDATE.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use wicket_auth::AuthResult;
use wicket_auth::storage::SessionStorage;
use wicket_auth::types::Session;

/// Session backend over a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl MemorySessionStorage {
    /// Creates an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Session>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn rotate(
        &self,
        id: Uuid,
        expected_secondary_hash: &str,
        new_primary_hash: &str,
        new_secondary_hash: &str,
    ) -> AuthResult<Option<Session>> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(&id) else {
            return Ok(None);
        };
        if session.is_revoked() || session.secondary_key_hash != expected_secondary_hash {
            return Ok(None);
        }

        session.primary_key_hash = new_primary_hash.to_string();
        session.secondary_key_hash = new_secondary_hash.to_string();
        session.rotated_at = OffsetDateTime::now_utc();
        Ok(Some(session.clone()))
    }

    async fn revoke(&self, id: Uuid) -> AuthResult<()> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&id)
            && session.revoked_at.is_none()
        {
            session.revoked_at = Some(OffsetDateTime::now_utc());
        }
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> AuthResult<u64> {
        let mut sessions = self.sessions.write().await;
        let now = OffsetDateTime::now_utc();
        let mut revoked = 0;
        for session in sessions.values_mut() {
            if session.user_id == user_id && session.revoked_at.is_none() {
                session.revoked_at = Some(now);
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn cleanup_revoked(&self, before: OffsetDateTime) -> AuthResult<u64> {
        let mut sessions = self.sessions.write().await;
        let len_before = sessions.len();
        sessions.retain(|_, s| !matches!(s.revoked_at, Some(at) if at < before));
        Ok((len_before - sessions.len()) as u64)
    }
}
