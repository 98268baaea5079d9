//! Command-line interface for cyberquest.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CyberQuest - gamified cybersecurity training service
#[derive(Parser, Debug)]
#[command(name = "cyberquest")]
#[command(about = "Cybersecurity mini-games, quizzes and courses over HTTP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API
    Serve {
        /// Port to bind to (default 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Optional TOML file overriding environment settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
