//! # wicket-bus
//!
//! Request/reply bus and auth delegation layer for Wicket services.
//!
//! Peer services never see the token signing secret. They hold a
//! [`RemoteAuthClient`] and delegate every authentication, authorization,
//! and profile lookup to the authority, which mounts the corresponding
//! topics via [`gateway::mount`].
//!
//! The transport is a topic-keyed in-process registry with an enforced
//! per-request deadline; the error contract (`NoResponders`, `Timeout`)
//! matches what a brokered transport would surface, so the delegation layer
//! is independent of where the authority actually runs.

pub mod client;
pub mod gateway;
pub mod messages;
pub mod rpc;

pub use client::RemoteAuthClient;
pub use messages::{
    AuthenticateRequest, AuthorizeRequest, ProfileRequest, Reply, ReplyError,
    TOPIC_AUTHENTICATION, TOPIC_AUTHORIZATION, TOPIC_PROFILE_USER, UserMessage,
};
pub use rpc::{Bus, BusError, DEFAULT_REQUEST_TIMEOUT};
