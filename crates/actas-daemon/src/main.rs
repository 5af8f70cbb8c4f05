//! Actas daemon - minutes and signature workflow service
//!
//! The daemon provides:
//! - REST API for acta documents and user profiles
//! - Signature request, verification, and recording workflow
//! - Pluggable storage (in-memory or PostgreSQL) and email delivery

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod server;

use config::DaemonConfig;
use error::DaemonResult;
use server::Server;

/// Actas daemon CLI
#[derive(Parser)]
#[command(name = "actasd")]
#[command(about = "Actas daemon - minutes and signature workflow service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ACTAS_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "ACTAS_LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level
    #[arg(long, env = "ACTAS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "ACTAS_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| error::DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| error::DaemonError::Config(format!("Invalid listen address: {e}")))?;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.server.listen_addr,
        "starting actas daemon"
    );

    // Create and run server
    let server = Server::new(config).await?;
    server.run().await
}
