//! CLI module for flatmod
//!
//! Provides command-line interface for:
//! - start: Load config, wire the service and serve HTTP
//! - token: Issue a token offline
//! - check-config: Validate configuration

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{build_authority, build_service, check_config, init_tracing, run, run_command, start, token};
pub use errors::{CliError, CliErrorCode, CliResult};
