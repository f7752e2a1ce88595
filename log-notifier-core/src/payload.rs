//! CloudWatch Logs subscription payloads.
//!
//! A delivery arrives as `{"awslogs": {"data": "<base64(gzip(json))>"}}`. This module turns that
//! envelope into a [`LogsPayload`] and picks the entry the relay notifies about.
//!
//! # Errors
//! Every step maps to its own [`RelayError`] variant so the invoker's failure record says which
//! layer of the payload was broken.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::error::RelayError;

/// The inbound Lambda event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsEnvelope {
    pub awslogs: AwsLogs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsLogs {
    /// base64-encoded, gzip-compressed JSON.
    pub data: String,
}

/// The decompressed delivery. Only `logEvents` is required.
///
/// Metadata fields are kept as raw JSON: a delivery is never rejected because of their types.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsPayload {
    #[serde(default)]
    pub message_type: Option<Value>,
    #[serde(default)]
    pub owner: Option<Value>,
    #[serde(default)]
    pub log_group: Option<Value>,
    #[serde(default)]
    pub log_stream: Option<Value>,
    #[serde(default)]
    pub subscription_filters: Option<Value>,
    /// Kept as raw JSON so the first entry can be logged exactly as delivered.
    #[serde(default)]
    pub log_events: Option<Vec<Value>>,
}

fn as_text(field: &Option<Value>) -> Option<&str> {
    field.as_ref().and_then(Value::as_str)
}

/// The first log event of a delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: Option<String>,
    pub timestamp: Option<i64>,
    pub message: String,
    /// The entry as delivered.
    pub raw: Value,
}

/// Decodes a Lambda event into its logs payload: envelope -> base64 -> gzip -> JSON.
pub fn decode_event(event: &Value) -> Result<LogsPayload, RelayError> {
    let envelope: LogsEnvelope = serde_json::from_value(event.clone()).map_err(|e| {
        error!(error = %e, "[DECODE] Event has no awslogs.data field");
        RelayError::Envelope(e)
    })?;
    decode_data(&envelope.awslogs.data)
}

/// Decodes the `awslogs.data` string.
pub fn decode_data(data: &str) -> Result<LogsPayload, RelayError> {
    let compressed = STANDARD.decode(data).map_err(|e| {
        error!(error = %e, "[DECODE] base64 decoding failed");
        RelayError::Base64(e)
    })?;
    debug!(compressed_len = compressed.len(), "[DECODE] base64 decoded");

    let mut json_bytes = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut json_bytes)
        .map_err(|e| {
            error!(error = %e, "[DECODE] gzip decompression failed");
            RelayError::Gzip(e)
        })?;
    debug!(json_len = json_bytes.len(), "[DECODE] gzip decompressed");

    let payload: LogsPayload = serde_json::from_slice(&json_bytes).map_err(|e| {
        error!(error = %e, "[DECODE] Decompressed payload is not valid JSON");
        RelayError::Json(e)
    })?;
    info!(
        message_type = payload.message_type().unwrap_or("-"),
        log_group = payload.log_group().unwrap_or("-"),
        log_stream = payload.log_stream().unwrap_or("-"),
        events = payload.log_events.as_ref().map_or(0, Vec::len),
        "[DECODE] Logs payload decoded"
    );
    Ok(payload)
}

impl LogsPayload {
    pub fn message_type(&self) -> Option<&str> {
        as_text(&self.message_type)
    }

    pub fn log_group(&self) -> Option<&str> {
        as_text(&self.log_group)
    }

    pub fn log_stream(&self) -> Option<&str> {
        as_text(&self.log_stream)
    }

    /// Returns `logEvents[0]` as delivered. Later events are ignored.
    pub fn first_event(&self) -> Result<&Value, RelayError> {
        let events = self.log_events.as_ref().ok_or(RelayError::MissingLogEvents)?;
        events.first().ok_or(RelayError::EmptyLogEvents)
    }
}

impl LogEntry {
    /// Reads a raw log event; only a string `message` is required.
    pub fn from_event(raw: &Value) -> Result<LogEntry, RelayError> {
        let message = raw
            .get("message")
            .and_then(Value::as_str)
            .ok_or(RelayError::MissingMessage)?;
        Ok(LogEntry {
            id: raw.get("id").and_then(Value::as_str).map(str::to_owned),
            timestamp: raw.get("timestamp").and_then(Value::as_i64),
            message: message.to_owned(),
            raw: raw.clone(),
        })
    }
}

/// Builds the `awslogs.data` string for a JSON payload: gzip, then base64.
pub fn encode_data(payload: &Value) -> std::io::Result<String> {
    let json_bytes = serde_json::to_vec(payload)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json_bytes)?;
    let compressed = encoder.finish()?;
    Ok(STANDARD.encode(compressed))
}

/// Wraps a JSON payload in a full Lambda event envelope.
pub fn encode_event(payload: &Value) -> std::io::Result<LogsEnvelope> {
    Ok(LogsEnvelope {
        awslogs: AwsLogs {
            data: encode_data(payload)?,
        },
    })
}

/// A single-event `DATA_MESSAGE` payload shaped like a CloudWatch Logs delivery.
pub fn sample_payload(message: &str, log_group: &str, log_stream: &str, timestamp: i64) -> Value {
    json!({
        "messageType": "DATA_MESSAGE",
        "owner": "123456789012",
        "logGroup": log_group,
        "logStream": log_stream,
        "subscriptionFilters": ["log-notifier"],
        "logEvents": [
            {
                "id": "0",
                "timestamp": timestamp,
                "message": message,
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_for(payload: &Value) -> Value {
        serde_json::to_value(encode_event(payload).unwrap()).unwrap()
    }

    #[test]
    fn decodes_first_entry_with_metadata() {
        let payload = sample_payload("登録: 記事 42", "/aws/lambda/admin", "2024/01/01/[$LATEST]abc", 1_700_000_000_000);
        let decoded = decode_event(&event_for(&payload)).unwrap();

        assert_eq!(decoded.message_type(), Some("DATA_MESSAGE"));
        assert_eq!(decoded.log_group(), Some("/aws/lambda/admin"));
        let entry = LogEntry::from_event(decoded.first_event().unwrap()).unwrap();
        assert_eq!(entry.message, "登録: 記事 42");
        assert_eq!(entry.id.as_deref(), Some("0"));
        assert_eq!(entry.timestamp, Some(1_700_000_000_000));
    }

    #[test]
    fn missing_awslogs_is_an_envelope_error() {
        let err = decode_event(&json!({"Records": []})).unwrap_err();
        assert!(matches!(err, RelayError::Envelope(_)), "got {err:?}");
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let err = decode_data("not base64!!").unwrap_err();
        assert!(matches!(err, RelayError::Base64(_)), "got {err:?}");
    }

    #[test]
    fn raw_deflate_is_not_accepted_as_gzip() {
        use flate2::write::DeflateEncoder;
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"logEvents":[{"message":"x"}]}"#).unwrap();
        let data = STANDARD.encode(encoder.finish().unwrap());

        let err = decode_data(&data).unwrap_err();
        assert!(matches!(err, RelayError::Gzip(_)), "got {err:?}");
    }

    #[test]
    fn zlib_stream_is_not_accepted_as_gzip() {
        use flate2::write::ZlibEncoder;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"logEvents":[{"message":"x"}]}"#).unwrap();
        let data = STANDARD.encode(encoder.finish().unwrap());

        let err = decode_data(&data).unwrap_err();
        assert!(matches!(err, RelayError::Gzip(_)), "got {err:?}");
    }

    #[test]
    fn oddly_typed_metadata_is_tolerated() {
        let payload = decode_event(&event_for(&json!({
            "owner": 123456789012_i64,
            "logGroup": null,
            "subscriptionFilters": null,
            "messageType": ["DATA_MESSAGE"],
            "logEvents": [{"message": "M"}]
        })))
        .unwrap();

        assert_eq!(payload.log_group(), None);
        assert_eq!(payload.message_type(), None);
        assert_eq!(LogEntry::from_event(payload.first_event().unwrap()).unwrap().message, "M");
    }

    #[test]
    fn non_json_content_is_rejected() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"plain text, not json").unwrap();
        let data = STANDARD.encode(encoder.finish().unwrap());

        let err = decode_data(&data).unwrap_err();
        assert!(matches!(err, RelayError::Json(_)), "got {err:?}");
    }

    #[test]
    fn first_event_distinguishes_missing_and_empty_events() {
        let missing = decode_event(&event_for(&json!({"messageType": "DATA_MESSAGE"}))).unwrap();
        assert!(matches!(missing.first_event(), Err(RelayError::MissingLogEvents)));

        let empty = decode_event(&event_for(&json!({"logEvents": []}))).unwrap();
        assert!(matches!(empty.first_event(), Err(RelayError::EmptyLogEvents)));
    }

    #[test]
    fn entry_requires_string_message() {
        let payload = decode_event(&event_for(&json!({"logEvents": [{"message": 7}]}))).unwrap();
        assert!(matches!(
            LogEntry::from_event(payload.first_event().unwrap()),
            Err(RelayError::MissingMessage)
        ));

        let payload = decode_event(&event_for(&json!({"logEvents": [{"id": "1"}]}))).unwrap();
        assert!(matches!(
            LogEntry::from_event(payload.first_event().unwrap()),
            Err(RelayError::MissingMessage)
        ));
    }
}
