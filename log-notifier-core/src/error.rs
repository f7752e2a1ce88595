//! Error types for the relay.
//!
//! Two classes, handled asymmetrically by [`crate::relay::handle`]:
//! - [`RelayError`]: the delivered payload is malformed. Always propagated to the invoker.
//! - [`DeliveryError`]: the notification could not be delivered. Logged and suppressed.

use crate::contract::PublishError;

/// A malformed inbound payload. Returned from [`crate::relay::handle`].
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The event has no `awslogs.data` string.
    #[error("event is not a CloudWatch Logs delivery: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not a gzip stream (raw deflate and zlib are rejected too).
    #[error("payload is not a valid gzip stream: {0}")]
    Gzip(#[source] std::io::Error),

    #[error("decompressed payload is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("payload has no logEvents field")]
    MissingLogEvents,

    #[error("payload logEvents is empty, nothing to notify")]
    EmptyLogEvents,

    #[error("first log event has no string `message` field")]
    MissingMessage,
}

/// The publish target could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(String),

    #[error("{0} must not be empty")]
    Empty(String),
}

/// A failed delivery. Never propagated past the relay.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("publish target unavailable: {0}")]
    Config(#[from] ConfigError),

    #[error("publish failed: {0}")]
    Publish(PublishError),
}
