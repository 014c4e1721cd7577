//! Seed commands.

use tax_simulator_server::db;
use tax_simulator_server::seed::{ADMIN_EMAIL, SeedOutcome, ensure_admin_account};

use super::{CommandError, connect};

/// Ensure the default administrator account exists.
///
/// Creates missing tables first so it works against an empty database.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the DDL fails or the seed
/// cannot be written.
pub async fn admin() -> Result<(), CommandError> {
    let pool = connect().await?;
    db::create_tables(&pool).await?;

    match ensure_admin_account(&pool).await? {
        SeedOutcome::Created(id) => {
            tracing::info!(account_id = %id, email = ADMIN_EMAIL, "Administrator created");
        }
        SeedOutcome::AlreadyPresent => {
            tracing::info!(email = ADMIN_EMAIL, "Administrator already present, nothing to do");
        }
    }

    Ok(())
}
