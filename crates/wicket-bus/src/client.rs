//! Caller side of auth delegation.
//!
//! What a peer service holds instead of the signing secret: every auth
//! decision is a request over the bus, and a transport failure surfaces as
//! `DependencyUnavailable`, never as an auth decision.

use uuid::Uuid;

use wicket_auth::AuthResult;

use crate::messages::{
    AuthenticateRequest, AuthorizeRequest, ProfileRequest, Reply, TOPIC_AUTHENTICATION,
    TOPIC_AUTHORIZATION, TOPIC_PROFILE_USER, UserMessage,
};
use crate::rpc::Bus;

/// Client for the auth authority's bus topics.
#[derive(Clone)]
pub struct RemoteAuthClient {
    bus: Bus,
}

impl RemoteAuthClient {
    /// Creates a client over the given bus.
    #[must_use]
    pub fn new(bus: Bus) -> Self {
        Self { bus }
    }

    /// Resolves an access token to its user.
    ///
    /// # Errors
    ///
    /// The authority's error (`Unauthenticated` and friends), or
    /// `DependencyUnavailable` for a transport failure.
    pub async fn authenticate(&self, token: &str) -> AuthResult<UserMessage> {
        let reply: Reply<UserMessage> = self
            .bus
            .request_json(
                TOPIC_AUTHENTICATION,
                &AuthenticateRequest {
                    value: token.to_string(),
                },
            )
            .await?;
        reply.into_result()
    }

    /// Checks a previously authenticated user against a role requirement,
    /// returning their fresh record on success.
    ///
    /// # Errors
    ///
    /// `Forbidden` or `NotFound` from the authority, or
    /// `DependencyUnavailable` for a transport failure.
    pub async fn authorize(&self, user: &UserMessage, roles: &[String]) -> AuthResult<UserMessage> {
        let reply: Reply<UserMessage> = self
            .bus
            .request_json(
                TOPIC_AUTHORIZATION,
                &AuthorizeRequest {
                    user: user.clone(),
                    roles: roles.to_vec(),
                },
            )
            .await?;
        reply.into_result()
    }

    /// Fetches a user's profile by id.
    ///
    /// # Errors
    ///
    /// `NotFound` from the authority, or `DependencyUnavailable` for a
    /// transport failure.
    pub async fn user_profile(&self, user_id: Uuid) -> AuthResult<UserMessage> {
        let reply: Reply<UserMessage> = self
            .bus
            .request_json(TOPIC_PROFILE_USER, &ProfileRequest { value: user_id })
            .await?;
        reply.into_result()
    }
}
