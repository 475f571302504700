//! Wire shapes for the auth delegation topics.
//!
//! Every reply is wrapped in [`Reply`]: either a data payload or a
//! `(kind, message)` error that reconstructs the originating [`AuthError`]
//! on the caller's side. Transport failures never masquerade as auth
//! decisions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wicket_auth::error::AuthError;
use wicket_auth::types::User;

/// Topic on which access tokens are resolved to users.
pub const TOPIC_AUTHENTICATION: &str = "auth.authentication";
/// Topic on which role requirements are checked.
pub const TOPIC_AUTHORIZATION: &str = "auth.authorization";
/// Topic on which public profiles are fetched.
pub const TOPIC_PROFILE_USER: &str = "auth.profile.user";

/// Authentication request: resolve a raw access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest {
    /// The access token, without the `Bearer ` prefix.
    pub value: String,
}

/// Authorization request: check a user against a role requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    /// The user to check, as the caller last saw them. Only the id is
    /// trusted; the authority re-reads the record so the decision runs
    /// against the current role set.
    pub user: UserMessage,
    /// Required role codes; any match grants access, empty always grants.
    pub roles: Vec<String>,
}

/// Profile request: fetch a user by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    /// The id of the user whose profile to fetch.
    pub value: Uuid,
}

/// User payload carried by every topic's successful reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessage {
    /// User id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Optional profile picture URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic_url: Option<String>,
    /// Wire form of the user's enabled roles.
    pub roles: Vec<String>,
}

impl From<&User> for UserMessage {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            profile_pic_url: user.profile_pic_url.clone(),
            roles: user
                .active_role_codes()
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
        }
    }
}

/// Error payload carried in a failed reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyError {
    /// Stable error kind discriminator.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

/// Reply envelope: exactly one of `data` or `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply<T> {
    /// Successful payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Failure payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReplyError>,
}

impl<T> Reply<T> {
    /// Wraps a successful payload.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Wraps an error.
    #[must_use]
    pub fn err(error: &AuthError) -> Self {
        Self {
            data: None,
            error: Some(ReplyError {
                kind: error.kind_str().to_string(),
                message: error.to_string(),
            }),
        }
    }

    /// Unwraps the envelope into the caller's result type.
    ///
    /// # Errors
    ///
    /// The reconstructed [`AuthError`] for an error reply; `Internal` for an
    /// envelope carrying neither data nor error.
    pub fn into_result(self) -> Result<T, AuthError> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(AuthError::from_kind_str(&error.kind, &error.message)),
            (None, None) => Err(AuthError::internal("empty reply envelope")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_field_names_on_the_wire() {
        let json = serde_json::to_value(AuthenticateRequest {
            value: "token-text".to_string(),
        })
        .unwrap();
        assert!(json.get("value").is_some());

        let json = serde_json::to_value(ProfileRequest {
            value: Uuid::new_v4(),
        })
        .unwrap();
        assert!(json.get("value").is_some());

        let json = serde_json::to_value(AuthorizeRequest {
            user: UserMessage {
                id: Uuid::new_v4(),
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                profile_pic_url: None,
                roles: vec!["LEARNER".to_string()],
            },
            roles: vec!["EDITOR".to_string()],
        })
        .unwrap();
        assert!(json.get("user").is_some());
        assert!(json["user"].get("email").is_some());
        assert!(json.get("roles").is_some());
    }

    #[test]
    fn test_reply_round_trip() {
        let reply = Reply::ok(42u32);
        let json = serde_json::to_string(&reply).unwrap();
        assert!(!json.contains("error"));

        let back: Reply<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_result().unwrap(), 42);
    }

    #[test]
    fn test_error_reply_reconstructs_kind() {
        let reply: Reply<u32> = Reply::err(&AuthError::unauthenticated("token expired"));
        let json = serde_json::to_string(&reply).unwrap();

        let back: Reply<u32> = serde_json::from_str(&json).unwrap();
        let err = back.into_result().unwrap_err();
        assert!(err.is_authentication_error());
    }

    #[test]
    fn test_empty_envelope_is_internal_error() {
        let reply: Reply<u32> = Reply {
            data: None,
            error: None,
        };
        let err = reply.into_result().unwrap_err();
        assert_eq!(err.kind_str(), "internal");
    }
}
