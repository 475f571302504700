use std::env;
use std::sync::Arc;

use wicket_bus::Bus;
use wicket_server::config::loader::load_config;
use wicket_server::{app, bootstrap, build_service, connect_backends, observability};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From WICKET_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (wicket.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (WICKET_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else), so environment
    // overrides work for local development.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    observability::init_tracing();

    let (config_path, source) = resolve_config_path();
    let config = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };
    tracing::info!(path = %config_path, source = %source, "Configuration loaded");
    observability::apply_logging_level(&config.logging.level);

    let backends = match connect_backends(&config).await {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Storage initialization failed: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = bootstrap::run(&backends.roles, &backends.api_keys, &config.bootstrap).await {
        eprintln!("Bootstrap failed: {e}");
        std::process::exit(2);
    }

    let service = build_service(&config, &backends);

    // Peer services in the same process reach the authority over the bus
    // instead of sharing the signing secret.
    let bus = Bus::default();
    wicket_bus::gateway::mount(&bus, Arc::clone(&service));

    let addr = config.addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind {addr}: {e}");
            std::process::exit(2);
        }
    };
    tracing::info!(%addr, "wicket authority listening");

    if let Err(e) = axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server error: {e}");
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}

/// Resolve the configuration file path.
///
/// Priority order:
/// 1. CLI argument: --config <path>
/// 2. Environment variable: WICKET_CONFIG
/// 3. Default: wicket.toml
fn resolve_config_path() -> (String, ConfigSource) {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return (path, ConfigSource::CliArgument);
            }
        }
    }

    if let Ok(path) = env::var("WICKET_CONFIG") {
        if !path.is_empty() {
            return (path, ConfigSource::EnvironmentVariable);
        }
    }

    ("wicket.toml".to_string(), ConfigSource::Default)
}
