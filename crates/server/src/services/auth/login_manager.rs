//! Registry for the authentication extension's callbacks.
//!
//! The application factory registers an unauthorized handler and an account
//! loader once at startup; the `RequireAuth` extractor consults them on
//! every protected request.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::future::{BoxFuture, FutureExt};
use sqlx::SqlitePool;

use tax_simulator_core::AccountId;

use crate::db::RepositoryError;
use crate::models::Account;

type UnauthorizedHandler = Arc<dyn Fn() -> Response + Send + Sync>;

type AccountLoader = Arc<
    dyn Fn(SqlitePool, AccountId) -> BoxFuture<'static, Result<Option<Account>, RepositoryError>>
        + Send
        + Sync,
>;

/// Holds the unauthorized handler and the account loader.
///
/// Cheap to clone; lives in `AppState`.
#[derive(Clone, Default)]
pub struct LoginManager {
    unauthorized: Option<UnauthorizedHandler>,
    loader: Option<AccountLoader>,
}

impl LoginManager {
    /// Create a manager with nothing registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the response returned when a request lacks a valid session.
    pub fn set_unauthorized_handler<F>(&mut self, handler: F)
    where
        F: Fn() -> Response + Send + Sync + 'static,
    {
        self.unauthorized = Some(Arc::new(handler));
    }

    /// Register how a session's account id is turned into an account.
    pub fn set_account_loader<F, Fut>(&mut self, loader: F)
    where
        F: Fn(SqlitePool, AccountId) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Account>, RepositoryError>> + Send + 'static,
    {
        self.loader = Some(Arc::new(
            move |pool: SqlitePool,
                  id: AccountId|
                  -> BoxFuture<'static, Result<Option<Account>, RepositoryError>> {
                loader(pool, id).boxed()
            },
        ));
    }

    /// Response for an unauthenticated request.
    ///
    /// Falls back to a bare 401 when no handler is registered.
    #[must_use]
    pub fn unauthorized(&self) -> Response {
        self.unauthorized
            .as_ref()
            .map_or_else(|| StatusCode::UNAUTHORIZED.into_response(), |handler| handler())
    }

    /// Resolve an account id through the registered loader.
    ///
    /// # Errors
    ///
    /// Propagates the loader's `RepositoryError`.
    pub async fn load_account(
        &self,
        pool: &SqlitePool,
        id: AccountId,
    ) -> Result<Option<Account>, RepositoryError> {
        match &self.loader {
            Some(loader) => loader(pool.clone(), id).await,
            None => Ok(None),
        }
    }
}

impl fmt::Debug for LoginManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginManager")
            .field("unauthorized_handler", &self.unauthorized.is_some())
            .field("account_loader", &self.loader.is_some())
            .finish()
    }
}
