//! Command-line interface for the parijs binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parijs - two-player tile placement match server
#[derive(Parser, Debug)]
#[command(name = "parijs")]
#[command(about = "Match server and bot client for Parijs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the match server
    Serve {
        /// Path to the server configuration file
        #[arg(short, long, default_value = "parijs.toml")]
        config: PathBuf,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Seconds a player may take per move (overrides the config file)
        #[arg(long)]
        move_timeout_secs: Option<u64>,

        /// Seed for deterministic shuffles (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Connect a bot player to a running server
    Bot {
        /// Server address
        #[arg(long, default_value = "127.0.0.1:7878")]
        addr: String,
    },
}
