//! CLI argument definitions using clap
//!
//! Commands:
//! - catalog-api serve [--config <path>] [overrides]
//! - catalog-api check-config [--config <path>] [overrides]

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigOverrides;

/// Catalog API - users and products over REST
#[derive(Parser, Debug)]
#[command(name = "catalog-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve(ConfigArgs),

    /// Load and validate the configuration, then print it
    CheckConfig(ConfigArgs),
}

/// Configuration file plus per-field overrides
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Store connection string (e.g. memory://default)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Secret used to sign access tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Access token lifetime in seconds
    #[arg(long, env = "TOKEN_TTL_SECS")]
    pub token_ttl_secs: Option<i64>,

    /// Products per page
    #[arg(long, env = "PAGE_SIZE")]
    pub page_size: Option<u64>,
}

impl ConfigArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            database_url: self.database_url.clone(),
            jwt_secret: self.jwt_secret.clone(),
            token_ttl_secs: self.token_ttl_secs,
            page_size: self.page_size,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_flags() {
        let cli = Cli::try_parse_from([
            "catalog-api",
            "serve",
            "--config",
            "catalog.json",
            "--port",
            "8080",
            "--jwt-secret",
            "abc",
        ])
        .unwrap();

        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.config, Some(PathBuf::from("catalog.json")));
        let overrides = args.overrides();
        assert_eq!(overrides.port, Some(8080));
        assert_eq!(overrides.jwt_secret.as_deref(), Some("abc"));
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn test_parse_check_config_json_logs() {
        let cli =
            Cli::try_parse_from(["catalog-api", "check-config", "--log-format", "json"]).unwrap();
        assert!(matches!(cli.command, Command::CheckConfig(_)));
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
