//! Database operations for the tax simulator SQLite database.
//!
//! ## Tables
//!
//! - `account` - Registered accounts, including the seeded administrator
//! - `tower_sessions` - Session storage (created by the session store)
//!
//! # Schema
//!
//! There is no migration history. Startup and `tax-cli schema` both run
//! [`create_tables`], which creates missing tables and leaves existing ones
//! untouched.

pub mod accounts;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use tower_sessions_sqlx_store::SqliteStore;

/// DDL for every table this crate owns. Each statement is idempotent.
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS account (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name       TEXT    NOT NULL,
        document_type   TEXT    NOT NULL,
        document_number TEXT    NOT NULL,
        email           TEXT    NOT NULL UNIQUE,
        password_hash   TEXT    NOT NULL,
        status          TEXT    NOT NULL DEFAULT 'activo',
        is_admin        BOOLEAN NOT NULL DEFAULT 0,
        created_at      TEXT    NOT NULL,
        updated_at      TEXT    NOT NULL,
        UNIQUE (document_type, document_number)
    )
    ",
];

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Open a SQLite connection pool, creating the database file if missing.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is malformed or the database cannot be opened.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create every missing table.
///
/// # Errors
///
/// Returns `sqlx::Error` if a statement fails.
pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!(tables = SCHEMA.len(), "Schema ensured");
    Ok(())
}

/// Create the session table and every application table.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session store migration or a statement fails.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    SqliteStore::new(pool.clone()).migrate().await?;
    create_schema(pool).await
}

/// Single-connection in-memory pool. Every connection to `sqlite::memory:`
/// is its own database, so the pool must never open a second one.
#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_schema_is_idempotent() {
        let pool = memory_pool().await;

        create_schema(&pool).await.expect("first run");
        create_schema(&pool).await.expect("second run");

        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'account'")
                .fetch_all(&pool)
                .await
                .expect("query sqlite_master");
        assert_eq!(tables, vec!["account".to_string()]);
    }

    #[tokio::test]
    async fn test_create_tables_includes_session_table() {
        let pool = memory_pool().await;

        create_tables(&pool).await.expect("first run");
        create_tables(&pool).await.expect("second run");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name IN ('account', 'tower_sessions') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .expect("query sqlite_master");
        assert_eq!(tables, vec!["account".to_string(), "tower_sessions".to_string()]);
    }

    #[tokio::test]
    async fn test_create_pool_creates_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fresh.db");
        let url = SecretString::from(format!("sqlite://{}", path.display()));

        let pool = create_pool(&url).await.expect("pool");
        create_schema(&pool).await.expect("schema");

        assert!(path.exists());
    }
}
