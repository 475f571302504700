//! In-memory user storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use wicket_auth::error::AuthError;
use wicket_auth::storage::UserStorage;
use wicket_auth::types::User;
use wicket_auth::AuthResult;

/// User backend over a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct MemoryUserStorage {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStorage {
    /// Creates an empty user store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStorage for MemoryUserStorage {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::bad_request("email already registered"));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn set_enabled(&self, id: Uuid, enabled: bool) -> AuthResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AuthError::not_found("user not found"))?;
        user.enabled = enabled;
        user.updated_at = time::OffsetDateTime::now_utc();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn user(email: &str) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            profile_pic_url: None,
            roles: vec![],
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let storage = MemoryUserStorage::new();
        let user = user("alice@example.com");
        storage.create(&user).await.unwrap();

        let by_id = storage.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");

        let by_email = storage
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let storage = MemoryUserStorage::new();
        storage.create(&user("alice@example.com")).await.unwrap();
        let err = storage.create(&user("alice@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_set_enabled() {
        let storage = MemoryUserStorage::new();
        let user = user("alice@example.com");
        storage.create(&user).await.unwrap();

        storage.set_enabled(user.id, false).await.unwrap();
        assert!(!storage.find_by_id(user.id).await.unwrap().unwrap().enabled);

        let err = storage.set_enabled(Uuid::new_v4(), false).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound { .. }));
    }
}
