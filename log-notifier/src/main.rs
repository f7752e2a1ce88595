use anyhow::Result;
use clap::Parser;
use log_notifier::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // CloudWatch timestamps every line, so the subscriber does not.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("log-notifier startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("log-notifier completed successfully"),
        Err(e) => tracing::error!(error = %e, "log-notifier exited with error"),
    }
    result
}
