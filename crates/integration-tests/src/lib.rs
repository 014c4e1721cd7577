//! Integration tests for the tax simulator application factory.
//!
//! Every test builds the real application through `create_app` against a
//! throwaway instance directory, so no external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tax-simulator-integration-tests
//! ```

use std::collections::HashMap;
use std::path::Path;

use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;

use tax_simulator_server::AppConfig;
use tax_simulator_server::config::ConfigError;

/// Configuration as if only `INSTANCE_PATH` were set.
///
/// # Errors
///
/// Returns `ConfigError` if the defaults fail to parse.
pub fn config_for(instance: &Path) -> Result<AppConfig, ConfigError> {
    config_with(instance, &[])
}

/// Configuration with `INSTANCE_PATH` plus extra variables.
///
/// # Errors
///
/// Returns `ConfigError` if a provided value fails to parse.
pub fn config_with(instance: &Path, extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let mut vars: HashMap<String, String> = extra
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    vars.insert(
        "INSTANCE_PATH".to_string(),
        instance.display().to_string(),
    );
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

/// Open a second, independent pool on the configured database.
///
/// The instance directory must already exist.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database cannot be opened.
pub async fn open_pool(config: &AppConfig) -> Result<SqlitePool, sqlx::Error> {
    tax_simulator_server::db::create_pool(&config.database_url).await
}

/// Number of rows in the `account` table.
///
/// # Errors
///
/// Returns `sqlx::Error` if the query fails.
pub async fn account_count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM account")
        .fetch_one(pool)
        .await
}

/// Collect a response body as JSON.
///
/// # Panics
///
/// Panics if the body cannot be read or is not JSON.
#[allow(clippy::expect_used)]
pub async fn read_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("JSON body")
}
