#![doc = "Publisher implementations: bridges the core Publisher trait to SNS, plus a dry-run publisher for local use."]
//
//! # Publisher Integration (binary <-> core)
//!
//! This module wires up the [`Publisher`] trait from `log-notifier-core` for real use against
//! Amazon SNS, and provides [`LogPublisher`] for `invoke --dry-run`.
//!
//! ## Client Usage
//!
//! - Construct [`SnsPublisher`] once per process with [`SnsPublisher::from_env`]; credentials and
//!   region come from the default AWS provider chain.
//! - The client is reused across invocations; it carries no per-invocation state.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::Client;

pub use log_notifier_core::contract::{PublishError, PublishReceipt, PublishRequest, Publisher};

/// Publishes notifications to SNS topics.
#[derive(Debug, Clone)]
pub struct SnsPublisher {
    client: Client,
}

impl SnsPublisher {
    pub fn new(client: Client) -> Self {
        SnsPublisher { client }
    }

    /// Builds a client from the default AWS configuration chain (env, profile, IMDS, Lambda role).
    pub async fn from_env() -> Self {
        let shared_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        tracing::info!(
            region = ?shared_config.region(),
            "Initialized SNS client from environment"
        );
        SnsPublisher::new(Client::new(&shared_config))
    }
}

#[async_trait]
impl Publisher for SnsPublisher {
    async fn publish<'a>(&self, req: PublishRequest<'a>) -> Result<PublishReceipt, PublishError> {
        tracing::info!(
            topic_arn = req.topic_arn,
            message_len = req.message.len(),
            "Publishing notification to SNS"
        );
        let result = self
            .client
            .publish()
            .topic_arn(req.topic_arn)
            .message(req.message)
            .subject(req.subject)
            .send()
            .await;

        match result {
            Ok(output) => {
                tracing::info!(
                    message_id = output.message_id().unwrap_or("-"),
                    "Successfully published notification"
                );
                Ok(PublishReceipt {
                    message_id: output.message_id().map(str::to_owned),
                })
            }
            Err(e) => {
                let detail = aws_sdk_sns::error::DisplayErrorContext(&e).to_string();
                tracing::error!(error = %detail, topic_arn = req.topic_arn, "SNS publish failed");
                Err(format!("SNS publish failed: {detail}").into())
            }
        }
    }
}

/// Prints the notification instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct LogPublisher;

#[async_trait]
impl Publisher for LogPublisher {
    async fn publish<'a>(&self, req: PublishRequest<'a>) -> Result<PublishReceipt, PublishError> {
        tracing::info!(topic_arn = req.topic_arn, "Dry run: notification not sent");
        println!("Topic: {}", req.topic_arn);
        println!("Subject: {}", req.subject);
        println!();
        println!("{}", req.message);
        Ok(PublishReceipt::default())
    }
}
