//! CLI module for the catalog service
//!
//! Provides command-line interface for:
//! - serve: Open the store and run the HTTP server
//! - check-config: Validate and print the effective configuration

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, ConfigArgs, LogFormat};
pub use commands::{check_config, init_logging, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
