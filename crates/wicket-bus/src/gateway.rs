//! Server side of auth delegation.
//!
//! Mounts the three auth topics on a bus, backed by the local
//! [`AuthService`]. Handlers never panic on bad input: an undecodable
//! request becomes a `bad_request` error reply.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use wicket_auth::error::AuthError;
use wicket_auth::service::AuthService;

use crate::messages::{
    AuthenticateRequest, AuthorizeRequest, ProfileRequest, Reply, TOPIC_AUTHENTICATION,
    TOPIC_AUTHORIZATION, TOPIC_PROFILE_USER, UserMessage,
};
use crate::rpc::Bus;

/// Emitted when a reply itself cannot be serialized. Kept as a literal so
/// the failure path needs no further serialization.
const REPLY_ENCODE_FAILURE: &[u8] =
    br#"{"error":{"kind":"internal","message":"reply serialization failed"}}"#;

fn decode_request<T: DeserializeOwned>(payload: &[u8]) -> Result<T, AuthError> {
    serde_json::from_slice(payload)
        .map_err(|e| AuthError::bad_request(format!("undecodable request: {e}")))
}

fn encode_reply<T: Serialize>(result: Result<T, AuthError>) -> Vec<u8> {
    let reply = match result {
        Ok(data) => Reply::ok(data),
        Err(error) => Reply::err(&error),
    };
    serde_json::to_vec(&reply).unwrap_or_else(|_| REPLY_ENCODE_FAILURE.to_vec())
}

/// Mounts the auth delegation topics on the given bus.
pub fn mount(bus: &Bus, service: Arc<AuthService>) {
    let authentication = Arc::clone(&service);
    bus.subscribe(TOPIC_AUTHENTICATION, move |payload: Vec<u8>| {
        let service = Arc::clone(&authentication);
        async move {
            encode_reply(authenticate(&service, &payload).await)
        }
    });

    let authorization = Arc::clone(&service);
    bus.subscribe(TOPIC_AUTHORIZATION, move |payload: Vec<u8>| {
        let service = Arc::clone(&authorization);
        async move {
            encode_reply(authorize(&service, &payload).await)
        }
    });

    let profile = service;
    bus.subscribe(TOPIC_PROFILE_USER, move |payload: Vec<u8>| {
        let service = Arc::clone(&profile);
        async move {
            encode_reply(public_profile(&service, &payload).await)
        }
    });

    info!("auth delegation topics mounted");
}

async fn authenticate(service: &AuthService, payload: &[u8]) -> Result<UserMessage, AuthError> {
    let request: AuthenticateRequest = decode_request(payload)?;
    let (user, _session) = service.authenticate_token(&request.value).await?;
    Ok(UserMessage::from(&user))
}

async fn authorize(service: &AuthService, payload: &[u8]) -> Result<UserMessage, AuthError> {
    let request: AuthorizeRequest = decode_request(payload)?;
    // Only the id is trusted; the role check runs against a fresh read so a
    // revoked role takes effect before the caller's copy ages out.
    let user = service
        .authorize_user_id(request.user.id, &request.roles)
        .await?;
    Ok(UserMessage::from(&user))
}

async fn public_profile(service: &AuthService, payload: &[u8]) -> Result<UserMessage, AuthError> {
    let request: ProfileRequest = decode_request(payload)?;
    let user = service.find_user(request.value).await?;
    Ok(UserMessage::from(&user))
}
