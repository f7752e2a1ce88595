use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::contract::TargetSource;
use crate::error::ConfigError;

/// Environment variable holding the destination topic ARN.
pub const TOPIC_ARN_ENV: &str = "SNS_TOPIC_ARN";
/// Environment variable holding the notification subject line.
pub const SUBJECT_ENV: &str = "ALARM_SUBJECT";

/// Where a notification goes and what it is titled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishTarget {
    pub topic_arn: String,
    pub subject: String,
}

impl PublishTarget {
    /// Builds a target, rejecting empty values.
    pub fn new(
        topic_arn: impl Into<String>,
        subject: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let topic_arn = topic_arn.into();
        let subject = subject.into();
        if topic_arn.trim().is_empty() {
            return Err(ConfigError::Empty("topic_arn".to_string()));
        }
        if subject.trim().is_empty() {
            return Err(ConfigError::Empty("subject".to_string()));
        }
        Ok(PublishTarget { topic_arn, subject })
    }

    pub fn trace_loaded(&self) {
        info!(topic_arn = %self.topic_arn, "Loaded PublishTarget");
        debug!(?self, "PublishTarget loaded (full debug)");
    }
}

/// A fixed target always resolves to itself.
impl TargetSource for PublishTarget {
    fn resolve(&self) -> Result<PublishTarget, ConfigError> {
        Ok(self.clone())
    }
}

/// Reads [`TOPIC_ARN_ENV`] and [`SUBJECT_ENV`] from the process environment on every call.
#[derive(Debug, Clone, Default)]
pub struct EnvTargetSource;

impl EnvTargetSource {
    fn var(key: &str) -> Result<String, ConfigError> {
        match std::env::var(key) {
            Ok(value) if value.trim().is_empty() => Err(ConfigError::Empty(key.to_string())),
            Ok(value) => Ok(value),
            Err(_) => Err(ConfigError::Missing(key.to_string())),
        }
    }
}

impl TargetSource for EnvTargetSource {
    fn resolve(&self) -> Result<PublishTarget, ConfigError> {
        let topic_arn = Self::var(TOPIC_ARN_ENV)?;
        let subject = Self::var(SUBJECT_ENV)?;
        Ok(PublishTarget { topic_arn, subject })
    }
}
