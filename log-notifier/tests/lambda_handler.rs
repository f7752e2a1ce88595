use lambda_runtime::{Context, LambdaEvent};
use log_notifier::lambda::function_handler;
use log_notifier_core::config::PublishTarget;
use log_notifier_core::contract::{MockPublisher, PublishReceipt};
use log_notifier_core::payload::{encode_event, sample_payload};
use serde_json::json;

fn target() -> PublishTarget {
    PublishTarget::new(
        "arn:aws:sns:ap-northeast-1:123456789012:content-registered",
        "Content registered",
    )
    .unwrap()
}

fn invocation(payload: serde_json::Value) -> LambdaEvent<serde_json::Value> {
    let event = serde_json::to_value(encode_event(&payload).unwrap()).unwrap();
    LambdaEvent::new(event, Context::default())
}

#[tokio::test]
async fn handler_succeeds_after_publishing() {
    let mut publisher = MockPublisher::new();
    publisher.expect_publish().times(1).returning(|_| {
        Ok(PublishReceipt {
            message_id: Some("0f1e2d3c".to_string()),
        })
    });

    let event = invocation(sample_payload("Hello", "/aws/lambda/admin-console", "s", 0));
    function_handler(event, &target(), &publisher)
        .await
        .expect("invocation should succeed");
}

#[tokio::test]
async fn handler_succeeds_when_publish_fails() {
    let mut publisher = MockPublisher::new();
    publisher
        .expect_publish()
        .times(1)
        .returning(|_| Err("Throttling: rate exceeded".into()));

    let event = invocation(sample_payload("Hello", "/aws/lambda/admin-console", "s", 0));
    function_handler(event, &target(), &publisher)
        .await
        .expect("publish failures are suppressed");
}

#[tokio::test]
async fn handler_fails_on_empty_log_events() {
    let mut publisher = MockPublisher::new();
    publisher.expect_publish().never();

    let err = function_handler(invocation(json!({"logEvents": []})), &target(), &publisher)
        .await
        .expect_err("empty logEvents must fail the invocation");
    assert!(err.to_string().contains("logEvents is empty"), "got: {err}");
}

#[tokio::test]
async fn handler_fails_on_non_logs_event() {
    let mut publisher = MockPublisher::new();
    publisher.expect_publish().never();

    let event = LambdaEvent::new(json!({"detail-type": "Scheduled Event"}), Context::default());
    let err = function_handler(event, &target(), &publisher)
        .await
        .expect_err("an event without awslogs.data must fail the invocation");
    assert!(err.to_string().contains("not a CloudWatch Logs delivery"), "got: {err}");
}
