//! Parijs - unified CLI

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use parijs_server::ServerConfig;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,parijs_server=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            move_timeout_secs,
            seed,
        } => {
            let mut config = ServerConfig::load_or_default(&config)?;
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if move_timeout_secs.is_some() {
                config = config.with_move_timeout_secs(move_timeout_secs);
            }
            if seed.is_some() {
                config = config.with_seed(seed);
            }
            run_server(config).await
        }
        Command::Bot { addr } => parijs_server::run_bot(&addr).await,
    }
}

/// Run the match server until Ctrl+C
#[instrument(skip_all)]
async fn run_server(config: ServerConfig) -> Result<()> {
    info!(?config, "Starting Parijs server");
    parijs_server::serve(config).await
}
