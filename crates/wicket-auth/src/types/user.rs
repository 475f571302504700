//! User domain type and its wire projections.
//!
//! The authority never hard-deletes users; accounts are soft-disabled and a
//! disabled account fails authentication like a missing one.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::types::role::{Role, RoleCode};

/// A user record owned by the identity authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Globally unique identifier.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Email address; unique across the authority.
    pub email: String,

    /// Argon2 PHC-format password hash. Embeds the per-record salt.
    /// Never serialized out of the storage layer.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional profile picture URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic_url: Option<String>,

    /// Roles this user holds. Resolved fresh at authorization time.
    pub roles: Vec<Role>,

    /// Soft-disable flag; disabled users never authenticate.
    pub enabled: bool,

    /// When this user was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When this user was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Returns `true` if the user holds the given role and it is enabled.
    #[must_use]
    pub fn has_role(&self, code: RoleCode) -> bool {
        self.roles.iter().any(|r| r.enabled && r.code == code)
    }

    /// Returns the codes of the user's enabled roles.
    #[must_use]
    pub fn active_role_codes(&self) -> Vec<RoleCode> {
        self.roles
            .iter()
            .filter(|r| r.enabled)
            .map(|r| r.code)
            .collect()
    }
}

/// Public projection of a user, safe to hand to any caller.
///
/// This is the shape returned by the `auth.profile.user` bus endpoint and
/// the public profile route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    /// User identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional profile picture URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic_url: Option<String>,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            profile_pic_url: user.profile_pic_url.clone(),
        }
    }
}

/// Private projection of a user, returned to the account owner only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPrivate {
    /// User identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Optional profile picture URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic_url: Option<String>,
    /// Codes of the user's enabled roles.
    pub roles: Vec<RoleCode>,
}

impl From<&User> for UserPrivate {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            profile_pic_url: user.profile_pic_url.clone(),
            roles: user.active_role_codes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(roles: Vec<Role>) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            profile_pic_url: None,
            roles,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_has_role_ignores_disabled_roles() {
        let mut editor = Role::new(RoleCode::Editor);
        editor.enabled = false;
        let user = test_user(vec![Role::new(RoleCode::Learner), editor]);

        assert!(user.has_role(RoleCode::Learner));
        assert!(!user.has_role(RoleCode::Editor));
        assert_eq!(user.active_role_codes(), vec![RoleCode::Learner]);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = test_user(vec![Role::new(RoleCode::Learner)]);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_public_projection_omits_email() {
        let user = test_user(vec![]);
        let public = UserPublic::from(&user);
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["name"], "Alice");
    }
}
