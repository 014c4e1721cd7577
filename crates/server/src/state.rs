//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::services::auth::LoginManager;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The pool and the login
/// manager are owned here and handed to handlers explicitly.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: SqlitePool,
    login_manager: LoginManager,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(pool: SqlitePool, login_manager: LoginManager) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pool,
                login_manager,
            }),
        }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the registered authentication callbacks.
    #[must_use]
    pub fn login_manager(&self) -> &LoginManager {
        &self.inner.login_manager
    }
}
