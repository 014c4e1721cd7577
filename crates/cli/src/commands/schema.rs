//! Schema command.

use tax_simulator_server::db;

use super::{CommandError, connect};

/// Create the session table and every missing application table.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the DDL fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    db::create_tables(&pool).await?;
    tracing::info!("Schema is up to date");

    Ok(())
}
