//! CLI interface for Passage

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "passage")]
#[command(version)]
#[command(about = "Minimal user-account and token authentication service", long_about = None)]
pub struct Cli {
    /// Path to passage.toml (searched upward from the working directory by default)
    #[arg(short, long, global = true, env = "PASSAGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default passage.toml in the current directory
    Init,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create the database tables
    Migrate,

    /// Remove revoked-token entries whose tokens have expired anyway
    Prune,
}
