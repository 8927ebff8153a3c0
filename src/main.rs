use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vigil::{
    config::AppConfig,
    http_client::build_http_client,
    notification::WebhookSink,
    providers::{http::HttpAlertSource, traits::ImmediateReadiness},
    supervisor::Supervisor,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration directory.
    #[arg(long)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the alert polling service under the supervisor.
    Run,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run(cli.config_dir.as_deref()).await?,
    }

    Ok(())
}

async fn run(config_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Loading application configuration...");
    let config = Arc::new(AppConfig::new(config_dir)?);
    tracing::info!(
        source_url = %config.alert.source_url,
        poll_interval = ?config.alert.poll_interval_secs,
        "Configuration loaded."
    );

    let client = build_http_client(&config.http)?;
    let source = Arc::new(HttpAlertSource::new(
        client.clone(),
        config.alert.source_url.clone(),
    ));
    let sink = Arc::new(WebhookSink::new(client, config.alert.webhook_url.clone()));

    // Webhook delivery needs no session handshake, so the poller starts
    // immediately.
    let supervisor = Supervisor::new(config, source, sink, Arc::new(ImmediateReadiness));

    tracing::info!("Supervisor initialized, starting alert polling...");
    supervisor.run().await;

    Ok(())
}
