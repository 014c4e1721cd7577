//! Account repository for database operations.
//!
//! Queries are checked at runtime (`query_as` + `FromRow`); rows are converted
//! into validated domain types, and anything that fails validation is reported
//! as `DataCorruption`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use tax_simulator_core::{AccountId, AccountStatus, DocumentType, Email};

use super::RepositoryError;
use crate::models::{Account, NewAccount};

/// Raw `account` row (without the password digest).
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i64,
    full_name: String,
    document_type: String,
    document_number: String,
    email: String,
    status: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Account row joined with its password digest.
#[derive(Debug, sqlx::FromRow)]
struct AccountWithHashRow {
    #[sqlx(flatten)]
    account: AccountRow,
    password_hash: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(r: AccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let document_type = r
            .document_type
            .parse::<DocumentType>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let status = r
            .status
            .parse::<AccountStatus>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: AccountId::new(r.id),
            full_name: r.full_name,
            document_type,
            document_number: r.document_number,
            email,
            status,
            is_admin: r.is_admin,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, full_name, document_type, document_number, email,
                   status, is_admin, created_at, updated_at
            FROM account
            WHERE id = ?
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    /// Whether an account with this email exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_by_email(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM account WHERE email = ?)")
                .bind(email.as_str())
                .fetch_one(self.pool)
                .await?;
        Ok(exists != 0)
    }

    /// Insert an account unless one with the same email already exists.
    ///
    /// Returns the new account, or `None` when the email was taken (the
    /// existing row is left untouched). Safe under concurrent callers: the
    /// UNIQUE constraint decides the winner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a different unique key collides
    /// (e.g. the document type/number pair).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_if_absent(
        &self,
        account: &NewAccount,
    ) -> Result<Option<Account>, RepositoryError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, AccountRow>(
            r"
            INSERT INTO account (full_name, document_type, document_number, email,
                                 password_hash, status, is_admin, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, full_name, document_type, document_number, email,
                      status, is_admin, created_at, updated_at
            ",
        )
        .bind(&account.full_name)
        .bind(account.document_type.as_str())
        .bind(&account.document_number)
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.status.as_str())
        .bind(account.is_admin)
        .bind(now)
        .bind(now)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("document already registered".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.map(Account::try_from).transpose()
    }

    /// Get an account and its password digest by email.
    ///
    /// Returns `None` if no account uses this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountWithHashRow>(
            r"
            SELECT id, full_name, document_type, document_number, email,
                   status, is_admin, created_at, updated_at, password_hash
            FROM account
            WHERE email = ?
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let account = Account::try_from(r.account)?;
        Ok(Some((account, r.password_hash)))
    }
}
