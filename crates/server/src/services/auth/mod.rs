//! Authentication service.
//!
//! Password login against stored Argon2 digests, plus the [`LoginManager`]
//! registry that resolves session account ids.

mod error;
mod login_manager;

pub use error::AuthError;
pub use login_manager::LoginManager;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use tax_simulator_core::Email;

use crate::db::accounts::AccountRepository;
use crate::models::Account;

/// Authentication service.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::AccountInactive` if the password matches but the
    /// account is disabled.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        let email = Email::parse(email)?;

        let (account, password_hash) = self
            .accounts
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        // Status is only revealed to callers that know the password.
        if !account.status.is_active() {
            return Err(AuthError::AccountInactive);
        }

        Ok(account)
    }
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a PHC-format hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{create_schema, memory_pool};
    use crate::models::NewAccount;
    use tax_simulator_core::{AccountStatus, DocumentType};

    async fn pool_with_account(status: AccountStatus) -> SqlitePool {
        let pool = memory_pool().await;
        create_schema(&pool).await.unwrap();
        AccountRepository::new(&pool)
            .create_if_absent(&NewAccount {
                full_name: "Luis Gómez".to_string(),
                document_type: DocumentType::Passport,
                document_number: "P-998".to_string(),
                email: Email::parse("luis@example.com").unwrap(),
                password_hash: hash_password("correct horse").unwrap(),
                status,
                is_admin: false,
            })
            .await
            .unwrap();
        pool
    }

    #[test]
    fn test_hash_is_salted_argon2id() {
        let first = hash_password("adminpassword").unwrap();
        let second = hash_password("adminpassword").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, "adminpassword");
        assert_ne!(first, second);
        assert!(verify_password("adminpassword", &first).is_ok());
        assert!(verify_password("adminpassword", &second).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_password_and_garbage_hash() {
        let hash = hash_password("adminpassword").unwrap();
        assert!(matches!(
            verify_password("nope", &hash),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            verify_password("adminpassword", "plaintext"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_succeeds_with_correct_password() {
        let pool = pool_with_account(AccountStatus::Active).await;
        let account = AuthService::new(&pool)
            .login_with_password("luis@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(account.email.as_str(), "luis@example.com");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let pool = pool_with_account(AccountStatus::Active).await;
        let auth = AuthService::new(&pool);

        assert!(matches!(
            auth.login_with_password("luis@example.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login_with_password("nadie@example.com", "correct horse").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login_with_password("not-an-email", "correct horse").await,
            Err(AuthError::InvalidEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_inactive_account_cannot_login() {
        let pool = pool_with_account(AccountStatus::Inactive).await;
        let auth = AuthService::new(&pool);

        assert!(matches!(
            auth.login_with_password("luis@example.com", "correct horse").await,
            Err(AuthError::AccountInactive)
        ));
        assert!(matches!(
            auth.login_with_password("luis@example.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
