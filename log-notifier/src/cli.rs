///
/// This module implements the CLI interface for log-notifier: the Lambda entrypoint plus
/// local helpers for exercising the relay without deploying it.
///
/// All decoding and relay logic lives in the [`log-notifier-core`] crate.
/// This module is strictly glue: argument parsing, publisher selection and output.
///
/// ## Commands
/// - `serve` (the default when no subcommand is given): run the Lambda runtime loop.
/// - `invoke`: run the relay once against an event JSON file.
/// - `encode`: build a CloudWatch Logs delivery event for a message.
///
/// [`log-notifier-core`]: ../../log-notifier-core/
use crate::lambda::serve;
use crate::load_config::resolve_targets;
use crate::publish::{LogPublisher, SnsPublisher};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log_notifier_core::contract::Publisher;
use log_notifier_core::payload::{encode_event, sample_payload};
use log_notifier_core::relay::{self, DeliveryOutcome};
use serde_json::Value;
use std::path::PathBuf;

/// CLI for log-notifier: relay CloudWatch Logs deliveries to SNS.
#[derive(Parser)]
#[clap(
    name = "log-notifier",
    version,
    about = "Relay the first CloudWatch Logs entry of a delivery to an SNS topic"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the AWS Lambda runtime loop (default)
    Serve,
    /// Run the relay once against a Lambda event stored in a JSON file
    Invoke {
        /// Path to the event JSON file ({"awslogs": {"data": ...}})
        #[clap(long)]
        event: PathBuf,
        /// YAML file with topic_arn and subject; defaults to SNS_TOPIC_ARN / ALARM_SUBJECT
        #[clap(long)]
        config: Option<PathBuf>,
        /// Print the notification instead of publishing it
        #[clap(long)]
        dry_run: bool,
    },
    /// Build a CloudWatch Logs delivery event carrying a single message
    Encode {
        /// Log message to embed
        #[clap(long)]
        message: String,
        #[clap(long, default_value = "/aws/lambda/admin-console")]
        log_group: String,
        #[clap(long, default_value = "local")]
        log_stream: String,
        /// Write the event here instead of stdout
        #[clap(long)]
        output: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve().await,
        Commands::Invoke {
            event,
            config,
            dry_run,
        } => invoke(event, config, dry_run).await,
        Commands::Encode {
            message,
            log_group,
            log_stream,
            output,
        } => encode(&message, &log_group, &log_stream, output),
    }
}

async fn invoke(event: PathBuf, config: Option<PathBuf>, dry_run: bool) -> Result<()> {
    tracing::info!(command = "invoke", event = ?event, dry_run, "Invoking relay locally");
    let content = std::fs::read_to_string(&event)
        .with_context(|| format!("Failed to read event file {:?}", event))?;
    let event_json: Value = serde_json::from_str(&content)
        .with_context(|| format!("Event file {:?} is not valid JSON", event))?;

    let targets = resolve_targets(config.as_deref())?;
    let publisher: Box<dyn Publisher> = if dry_run {
        Box::new(LogPublisher)
    } else {
        Box::new(SnsPublisher::from_env().await)
    };

    match relay::handle(&event_json, targets.as_ref(), publisher.as_ref()).await {
        Ok(DeliveryOutcome::Published(receipt)) => {
            tracing::info!(command = "invoke", ?receipt, "Notification published");
            Ok(())
        }
        Ok(DeliveryOutcome::Suppressed(e)) => {
            tracing::warn!(command = "invoke", error = %e, "Notification not delivered");
            Ok(())
        }
        Err(e) => {
            tracing::error!(command = "invoke", error = %e, "Relay rejected the event");
            Err(anyhow::Error::new(e).context("Relay rejected the event"))
        }
    }
}

fn encode(message: &str, log_group: &str, log_stream: &str, output: Option<PathBuf>) -> Result<()> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or_default())
        .unwrap_or_default();
    let payload = sample_payload(message, log_group, log_stream, timestamp);
    let envelope = encode_event(&payload).context("Failed to compress payload")?;
    let json = serde_json::to_string_pretty(&envelope)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write event file {:?}", path))?;
            tracing::info!(command = "encode", output = ?path, "Event written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
