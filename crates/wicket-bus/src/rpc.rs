//! Request/reply plumbing.
//!
//! A topic-keyed registry of async handlers with an enforced per-request
//! deadline. The caller sees exactly three failure modes: no responder on
//! the topic, deadline exceeded, or an undecodable payload. Handlers run on
//! the caller's task; the registry itself never blocks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use wicket_auth::error::AuthError;

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors crossing the bus boundary.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// No handler is subscribed on the topic.
    #[error("no responders on topic '{topic}'")]
    NoResponders {
        /// The topic that had no subscriber.
        topic: String,
    },

    /// The handler did not reply within the deadline.
    #[error("request on topic '{topic}' timed out")]
    Timeout {
        /// The topic whose handler timed out.
        topic: String,
    },

    /// A payload could not be encoded or decoded.
    #[error("codec error: {message}")]
    Codec {
        /// Description of the codec failure.
        message: String,
    },
}

impl From<BusError> for AuthError {
    fn from(err: BusError) -> Self {
        AuthError::dependency_unavailable(err.to_string())
    }
}

type HandlerFn = Arc<dyn Fn(Vec<u8>) -> BoxFuture<'static, Vec<u8>> + Send + Sync>;

/// Topic-keyed request/reply registry.
///
/// Cheap to clone; all clones share the same subscriptions.
#[derive(Clone)]
pub struct Bus {
    handlers: Arc<DashMap<String, HandlerFn>>,
    request_timeout: Duration,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

impl Bus {
    /// Creates a bus with the given per-request deadline.
    #[must_use]
    pub fn new(request_timeout: Duration) -> Self {
        Self {
            handlers: Arc::new(DashMap::new()),
            request_timeout,
        }
    }

    /// Subscribes a handler on a topic, replacing any previous subscriber.
    pub fn subscribe<F, Fut>(&self, topic: impl Into<String>, handler: F)
    where
        F: Fn(Vec<u8>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Vec<u8>> + Send + 'static,
    {
        let topic = topic.into();
        debug!(topic = %topic, "subscribed handler");
        self.handlers
            .insert(topic, Arc::new(move |payload| Box::pin(handler(payload))));
    }

    /// Sends a request and awaits the reply, subject to the deadline.
    ///
    /// # Errors
    ///
    /// - `NoResponders` if nothing is subscribed on the topic
    /// - `Timeout` if the handler exceeds the deadline
    pub async fn request(&self, topic: &str, payload: Vec<u8>) -> Result<Vec<u8>, BusError> {
        let handler = self
            .handlers
            .get(topic)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| BusError::NoResponders {
                topic: topic.to_string(),
            })?;

        tokio::time::timeout(self.request_timeout, handler(payload))
            .await
            .map_err(|_| BusError::Timeout {
                topic: topic.to_string(),
            })
    }

    /// Typed request: serializes the request, sends it, decodes the reply.
    ///
    /// # Errors
    ///
    /// `Codec` on top of the failure modes of [`Bus::request`].
    pub async fn request_json<Req, Resp>(&self, topic: &str, request: &Req) -> Result<Resp, BusError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(request).map_err(codec_error)?;
        let reply = self.request(topic, payload).await?;
        serde_json::from_slice(&reply).map_err(codec_error)
    }
}

fn codec_error(err: serde_json::Error) -> BusError {
    BusError::Codec {
        message: err.to_string(),
    }
}
