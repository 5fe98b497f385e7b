//! CLI command implementations
//!
//! `serve` opens the store, builds the HTTP server and runs it on a tokio
//! runtime until Ctrl-C. `check-config` resolves the configuration exactly
//! as `serve` would and prints it with the secret masked.

use std::io::Write;

use crate::auth::JwtManager;
use crate::config::ServiceConfig;
use crate::http_server::{AppState, HttpServer};
use crate::repository::collections;
use crate::store;

use super::args::{Cli, Command, ConfigArgs, LogFormat};
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(cli.log_format);
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(resolve_config(&args)?),
        Command::CheckConfig(args) => check_config(&resolve_config(&args)?),
    }
}

/// Install the global tracing subscriber; `RUST_LOG` wins over the default
pub fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    // already installed (tests)
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Config file, then overrides, then validation
pub fn resolve_config(args: &ConfigArgs) -> CliResult<ServiceConfig> {
    Ok(ServiceConfig::load(args.config.as_deref())?.resolve(args.overrides())?)
}

/// Print the effective configuration
pub fn check_config(config: &ServiceConfig) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(&config.redacted())?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered)?;
    Ok(())
}

/// Start the HTTP server and block until it stops
pub fn serve(config: ServiceConfig) -> CliResult<()> {
    let jwt = JwtManager::new(config.jwt_config()?);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let store = store::connect(&config.store, collections()).await?;
        let state = AppState::new(store.clone(), jwt, config.pagination.page_size);
        let server = HttpServer::new(config.http.clone(), state, store);

        server
            .start(shutdown_signal())
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "failed to listen for shutdown signal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_resolve_config_requires_secret() {
        let args = ConfigArgs::default();
        let err = resolve_config(&args).unwrap_err();
        assert_eq!(err.message(), ConfigError::MissingSecret.to_string());
    }

    #[test]
    fn test_resolve_config_with_overrides() {
        let args = ConfigArgs {
            jwt_secret: Some("abc".to_string()),
            page_size: Some(10),
            ..Default::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.pagination.page_size, 10);
        check_config(&config).unwrap();
    }

    #[test]
    fn test_serve_rejects_unknown_store() {
        let args = ConfigArgs {
            jwt_secret: Some("abc".to_string()),
            database_url: Some("mongodb://localhost/shop".to_string()),
            ..Default::default()
        };
        let err = serve(resolve_config(&args).unwrap()).unwrap_err();
        assert!(err.message().contains("unsupported store url"));
    }
}
