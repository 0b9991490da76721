//! Server binary for the minigames leaderboard.
//!
//! Wires configuration, logging, and the chosen result store into the
//! HTTP API, then serves until interrupted.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `leaderboard-config.yaml` (or the path in
//!    `LEADERBOARD_CONFIG`), falling back to defaults plus env overrides
//! 2. Initialize structured logging (tracing)
//! 3. Open the result store: `PostgreSQL` (running migrations if enabled)
//!    or in-memory
//! 4. Serve the API until `Ctrl-C` / `SIGTERM`
//! 5. Close the connection pool

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use leaderboard_api::{AppState, ServerConfig};
use leaderboard_core::config::{LeaderboardConfig, LogFormat, StorageBackend};
use leaderboard_core::{MemoryStore, ResultStore};
use leaderboard_db::{PostgresConfig, PostgresPool};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "leaderboard-config.yaml";

/// Application entry point for the leaderboard server.
///
/// # Errors
///
/// Returns an error if configuration, the store, or the server fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration. Logging is not up yet, so report after init.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config);
    info!(config = %source, "leaderboard-server starting");

    let server = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let expose = config.api.expose_store_errors;

    // 3-4. Open the store and serve.
    match config.storage.backend {
        StorageBackend::Postgres => {
            let pg_config = PostgresConfig::from_section(&config.database);
            let pool = PostgresPool::connect(&pg_config).await?;
            info!(
                max_connections = pg_config.max_connections,
                "PostgreSQL pool connected"
            );

            if config.database.run_migrations {
                pool.run_migrations().await?;
                info!("Migrations applied");
            }

            let result = serve(&server, pool.clone(), expose).await;

            // 5. Close the pool whether or not serving succeeded.
            pool.close().await;
            info!("PostgreSQL pool closed");
            result?;
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store; results are lost on restart");
            serve(&server, MemoryStore::new(), expose).await?;
        }
    }

    info!("leaderboard-server stopped");
    Ok(())
}

/// Serve the API over `store` until shutdown.
async fn serve<S: ResultStore>(
    server: &ServerConfig,
    store: S,
    expose_store_errors: bool,
) -> Result<(), AppError> {
    let state = Arc::new(AppState::new(store).with_exposed_store_errors(expose_store_errors));
    leaderboard_api::start_server(server, state).await?;
    Ok(())
}

/// Load configuration, returning it with a description of its source.
///
/// Reads `LEADERBOARD_CONFIG` if set, else [`DEFAULT_CONFIG_PATH`]. A
/// missing default file means defaults plus env overrides; a missing
/// explicitly named file is an error.
fn load_config() -> Result<(LeaderboardConfig, String), AppError> {
    let explicit = std::env::var_os("LEADERBOARD_CONFIG").map(PathBuf::from);
    let path = explicit
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    if explicit.is_some() || path.exists() {
        let config = LeaderboardConfig::from_file(&path)?;
        Ok((config, path.display().to_string()))
    } else {
        Ok((LeaderboardConfig::from_env()?, String::from("defaults")))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(config: &LeaderboardConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match config.logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
