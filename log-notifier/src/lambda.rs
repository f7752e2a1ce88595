//! Lambda runtime glue: one relay run per invocation.

use anyhow::Result;
use lambda_runtime::{service_fn, LambdaEvent};
use log_notifier_core::config::EnvTargetSource;
use log_notifier_core::contract::{Publisher, TargetSource};
use log_notifier_core::relay::{self, DeliveryOutcome};
use serde_json::Value;
use tracing::Instrument;

use crate::publish::SnsPublisher;

/// Handles one invocation. Returns an error only when the payload itself is malformed.
pub async fn function_handler<T, P>(
    event: LambdaEvent<Value>,
    targets: &T,
    publisher: &P,
) -> Result<(), lambda_runtime::Error>
where
    T: TargetSource + ?Sized,
    P: Publisher + ?Sized,
{
    let (payload, context) = event.into_parts();
    let span = tracing::info_span!("invocation", request_id = %context.request_id);

    match relay::handle(&payload, targets, publisher).instrument(span).await {
        Ok(DeliveryOutcome::Published(_)) => Ok(()),
        Ok(DeliveryOutcome::Suppressed(_)) => {
            tracing::warn!(request_id = %context.request_id, "Invocation completed without delivery");
            Ok(())
        }
        Err(e) => {
            tracing::error!(request_id = %context.request_id, error = %e, "Rejected log delivery");
            Err(e.into())
        }
    }
}

/// Runs the Lambda runtime loop with a process-lifetime SNS client.
pub async fn serve() -> Result<()> {
    let publisher = SnsPublisher::from_env().await;
    let targets = EnvTargetSource;
    tracing::info!("Starting Lambda runtime");
    lambda_runtime::run(service_fn(|event| {
        function_handler(event, &targets, &publisher)
    }))
    .await
    .map_err(|e| anyhow::anyhow!("Lambda runtime exited: {e}"))
}
