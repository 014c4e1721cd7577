//! Default administrator seeding.
//!
//! Runs on every startup. The first run creates the administrator account;
//! every later run finds it and does nothing. Two processes starting against
//! the same database race on the UNIQUE email constraint, and the loser
//! reports the account as already present.

use sqlx::SqlitePool;
use thiserror::Error;

use tax_simulator_core::{AccountId, AccountStatus, DocumentType, Email};

use crate::db::RepositoryError;
use crate::db::accounts::AccountRepository;
use crate::models::NewAccount;
use crate::services::auth::{AuthError, hash_password};

/// Sentinel email identifying the seeded administrator.
pub const ADMIN_EMAIL: &str = "admin@example.com";

const ADMIN_FULL_NAME: &str = "Administrador";
const ADMIN_DOCUMENT_NUMBER: &str = "00000000";
const ADMIN_PASSWORD: &str = "adminpassword";

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Database lookup or insert failed.
    #[error("seed database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Hashing the default password failed.
    #[error("seed credential error: {0}")]
    Auth(#[from] AuthError),
}

/// What the seeder did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The administrator account was inserted by this call.
    Created(AccountId),
    /// An account with the sentinel email already existed.
    AlreadyPresent,
}

/// Ensure the default administrator account exists.
///
/// An existing account with the sentinel email is never modified.
///
/// # Errors
///
/// Returns `SeedError::Repository` if the database fails.
/// Returns `SeedError::Auth` if the password cannot be hashed.
pub async fn ensure_admin_account(pool: &SqlitePool) -> Result<SeedOutcome, SeedError> {
    let repo = AccountRepository::new(pool);
    let email = Email::parse(ADMIN_EMAIL).map_err(AuthError::from)?;

    if repo.exists_by_email(&email).await? {
        tracing::debug!(email = %email, "Administrator account already present");
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let account = NewAccount {
        full_name: ADMIN_FULL_NAME.to_owned(),
        document_type: DocumentType::Admin,
        document_number: ADMIN_DOCUMENT_NUMBER.to_owned(),
        email,
        password_hash: hash_password(ADMIN_PASSWORD)?,
        status: AccountStatus::Active,
        is_admin: true,
    };

    match repo.create_if_absent(&account).await? {
        Some(created) => {
            tracing::info!(account_id = %created.id, "Default administrator account created");
            Ok(SeedOutcome::Created(created.id))
        }
        None => {
            tracing::debug!("Administrator account created concurrently");
            Ok(SeedOutcome::AlreadyPresent)
        }
    }
}
