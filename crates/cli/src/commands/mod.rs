//! CLI subcommands.

pub mod schema;
pub mod seed;

use sqlx::SqlitePool;
use thiserror::Error;

use tax_simulator_server::app::{StartupError, ensure_instance_dir};
use tax_simulator_server::config::{AppConfig, ConfigError};
use tax_simulator_server::db;
use tax_simulator_server::seed::SeedError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment could not be turned into a configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Instance directory could not be prepared.
    #[error("{0}")]
    Startup(#[from] StartupError),

    /// Database connection or DDL error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Administrator seeding failed.
    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),
}

/// Load configuration and open the database the server would use.
async fn connect() -> Result<SqlitePool, CommandError> {
    let config = AppConfig::from_env()?;
    ensure_instance_dir(&config.instance_path).await?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    Ok(pool)
}
