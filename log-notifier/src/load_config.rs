/// `load_config` module: resolves where notifications are published.
///
/// In Lambda the target always comes from the environment (`SNS_TOPIC_ARN`, `ALARM_SUBJECT`),
/// read on every invocation by [`EnvTargetSource`]. For local `invoke` runs a YAML file may be
/// given instead:
///
/// ```yaml
/// topic_arn: arn:aws:sns:ap-northeast-1:123456789012:content-registered
/// subject: Content registered
/// ```
///
/// # Errors
/// File and parse errors use `anyhow::Error` and surface at the CLI boundary. A missing
/// environment variable is *not* an error here: it is reported by the relay at publish time.
use anyhow::{Context, Result};
use log_notifier_core::config::{EnvTargetSource, PublishTarget};
use log_notifier_core::contract::TargetSource;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    pub topic_arn: String,
    pub subject: String,
}

/// Loads a publish target from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PublishTarget> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = fs::read_to_string(path_ref)
        .with_context(|| format!("Failed to read config file {:?}", path_ref))?;

    let raw: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let target = PublishTarget::new(raw.topic_arn, raw.subject)
        .with_context(|| format!("Invalid publish target in {:?}", path_ref))?;
    target.trace_loaded();
    Ok(target)
}

/// Picks the target source: the YAML file when given, otherwise the environment.
pub fn resolve_targets(config: Option<&Path>) -> Result<Box<dyn TargetSource>> {
    match config {
        Some(path) => Ok(Box::new(load_config(path)?)),
        None => {
            info!("No config file given, publish target will be read from the environment");
            Ok(Box::new(EnvTargetSource))
        }
    }
}
