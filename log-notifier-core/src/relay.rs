//! Notification relay: decode -> extract -> render -> publish.
//!
//! This module is the whole request path of the Lambda. It:
//!   - Decodes the CloudWatch Logs delivery carried by the event (see [`crate::payload`])
//!   - Writes the first log entry to the diagnostic stream
//!   - Renders the notification body (see [`crate::message`])
//!   - Resolves the publish target and publishes through a [`Publisher`]
//!
//! # Error Handling
//! Payload errors ([`RelayError`]) propagate so the invoker records a failed invocation.
//! Delivery errors are returned inside [`DeliveryOutcome::Suppressed`] after being logged;
//! the invocation still succeeds. Callers must not turn a suppressed delivery into an error.

use serde_json::Value;
use tracing::{error, info};

use crate::contract::{PublishReceipt, PublishRequest, Publisher, TargetSource};
use crate::error::{DeliveryError, RelayError};
use crate::message::render_notification;
use crate::payload::{decode_event, LogEntry};

/// What happened to the notification once the payload was accepted.
#[derive(Debug)]
pub enum DeliveryOutcome {
    Published(PublishReceipt),
    /// Delivery failed; the error was logged and is not propagated.
    Suppressed(DeliveryError),
}

impl DeliveryOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, DeliveryOutcome::Published(_))
    }
}

/// Handles one log delivery event.
pub async fn handle<T, P>(
    event: &Value,
    targets: &T,
    publisher: &P,
) -> Result<DeliveryOutcome, RelayError>
where
    T: TargetSource + ?Sized,
    P: Publisher + ?Sized,
{
    info!("[RELAY] Handling log delivery");

    let payload = decode_event(event)?;
    let raw = payload.first_event().map_err(|e| {
        error!(error = %e, "[RELAY][ERROR] No log event in payload");
        e
    })?;
    info!(log_entry = %raw, "[RELAY] Decoded log entry");

    let entry = LogEntry::from_event(raw).map_err(|e| {
        error!(error = %e, "[RELAY][ERROR] First log event has no usable message");
        e
    })?;

    let body = render_notification(&entry.message);

    let outcome = deliver(targets, publisher, &body).await;
    match &outcome {
        DeliveryOutcome::Published(receipt) => info!(
            message_id = receipt.message_id.as_deref().unwrap_or("-"),
            "[RELAY] Notification published"
        ),
        DeliveryOutcome::Suppressed(e) => error!(
            error = %e,
            "[RELAY][ERROR] Notification not delivered, suppressing"
        ),
    }
    Ok(outcome)
}

async fn deliver<T, P>(targets: &T, publisher: &P, body: &str) -> DeliveryOutcome
where
    T: TargetSource + ?Sized,
    P: Publisher + ?Sized,
{
    let target = match targets.resolve() {
        Ok(target) => target,
        Err(e) => return DeliveryOutcome::Suppressed(DeliveryError::Config(e)),
    };
    info!(topic_arn = %target.topic_arn, "[PUBLISH] Publishing notification");

    let req = PublishRequest {
        topic_arn: &target.topic_arn,
        message: body,
        subject: &target.subject,
    };
    match publisher.publish(req).await {
        Ok(receipt) => DeliveryOutcome::Published(receipt),
        Err(e) => DeliveryOutcome::Suppressed(DeliveryError::Publish(e)),
    }
}
