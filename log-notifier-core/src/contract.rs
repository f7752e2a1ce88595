//! # contract: seams between the relay and the outside world
//!
//! This module defines the two traits the relay depends on:
//! - [`Publisher`]: sends one notification to a topic (SNS in production, a mock in tests).
//! - [`TargetSource`]: resolves the topic and subject for the current invocation.
//!
//! ## Mocking & Testing
//! - [`Publisher`] is annotated for `mockall`; `MockPublisher` is exported under the
//!   `test-export-mocks` feature (on by default) so the binary crate's tests can use it.

use async_trait::async_trait;

use mockall::automock;

use crate::config::PublishTarget;
use crate::error::ConfigError;

/// Error type for the Publisher trait (simple boxed error, like the SDK errors it wraps).
pub type PublishError = Box<dyn std::error::Error + Send + Sync>;

/// Everything needed for one publish call.
#[derive(Debug, Clone, Copy)]
pub struct PublishRequest<'a> {
    /// Destination topic identifier (an SNS topic ARN).
    pub topic_arn: &'a str,
    /// Rendered notification body.
    pub message: &'a str,
    /// Subject line, used as the email subject by SNS.
    pub subject: &'a str,
}

/// Acknowledgment returned by a successful publish.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Service-assigned message id, when the implementation has one.
    pub message_id: Option<String>,
}

/// Trait for publishing a notification to a topic.
/// The implementor is responsible for connecting to the messaging service.
///
/// Implementations must not retry: a failed publish is reported once and the
/// relay decides what to do with it.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a single message to `req.topic_arn`.
    async fn publish<'a>(&self, req: PublishRequest<'a>) -> Result<PublishReceipt, PublishError>;
}

/// Trait for resolving the publish target at invocation time.
pub trait TargetSource: Send + Sync {
    fn resolve(&self) -> Result<PublishTarget, ConfigError>;
}
