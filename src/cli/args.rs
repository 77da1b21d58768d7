//! CLI argument definitions using clap
//!
//! Commands:
//! - flatmod start [--config <path>] [--port <port>]
//! - flatmod token --role <client|moderator> [--config <path>]
//! - flatmod check-config [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// flatmod - property-listing moderation service
#[derive(Parser, Debug)]
#[command(name = "flatmod")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./flatmod.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a token for a role, signed with the configured secret
    Token {
        /// Role to assert: client or moderator
        #[arg(long)]
        role: String,

        /// Path to configuration file
        #[arg(long, default_value = "./flatmod.json")]
        config: PathBuf,
    },

    /// Validate the configuration file and exit
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = "./flatmod.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
