//! Application factory.
//!
//! [`create_app`] turns an [`AppConfig`] into a ready-to-serve router:
//! instance directory, database pool, session store, login manager
//! registrations, API routes, schema and the administrator seed. It never
//! binds a listener.

use std::io;
use std::path::Path;

use axum::Router;
use axum::http::HeaderValue;
use axum::response::IntoResponse;
use sqlx::SqlitePool;
use thiserror::Error;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::AppConfig;
use crate::db::{self, accounts::AccountRepository};
use crate::error::AppError;
use crate::middleware::create_session_layer;
use crate::routes;
use crate::seed::{self, SeedError};
use crate::services::auth::LoginManager;
use crate::state::AppState;

/// The only origin allowed to make credentialed cross-origin requests.
pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";

/// Errors that abort application startup.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The instance directory could not be created.
    #[error("cannot create instance directory {path}: {source}")]
    InstanceDir {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Connecting to or preparing the database failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The administrator seed failed.
    #[error("seed error: {0}")]
    Seed(#[from] SeedError),
}

/// A fully wired application.
#[derive(Clone)]
pub struct App {
    router: Router,
}

impl App {
    /// The router with state, session, tracing and CORS layers applied.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Build the application from configuration.
///
/// # Errors
///
/// Returns `StartupError` if the instance directory cannot be created, the
/// database cannot be opened or prepared, or the seed fails.
pub async fn create_app(config: AppConfig) -> Result<App, StartupError> {
    ensure_instance_dir(&config.instance_path).await?;

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!(instance_path = %config.instance_path.display(), "Database pool created");

    build_app(config, pool).await
}

/// Build the application around an already-open pool.
///
/// # Errors
///
/// Returns `StartupError` if the schema cannot be created or the seed fails.
pub async fn build_app(config: AppConfig, pool: SqlitePool) -> Result<App, StartupError> {
    let mut login_manager = LoginManager::new();
    login_manager.set_unauthorized_handler(|| AppError::Unauthorized.into_response());
    login_manager.set_account_loader(|pool, id| async move {
        AccountRepository::new(&pool).get_by_id(id).await
    });

    let store = SqliteStore::new(pool.clone());
    let session_layer = create_session_layer(store, &config);
    let state = AppState::new(pool, login_manager);

    let router = Router::new()
        .merge(routes::health_routes())
        .nest("/api", routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone())
        .layer(cors_layer());

    db::create_tables(state.pool()).await?;
    seed::ensure_admin_account(state.pool()).await?;

    Ok(App { router })
}

/// Create the instance directory, tolerating one that already exists.
///
/// # Errors
///
/// Returns `StartupError::InstanceDir` for any failure other than
/// "already exists".
pub async fn ensure_instance_dir(path: &Path) -> Result<(), StartupError> {
    match tokio::fs::create_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(StartupError::InstanceDir {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Credentialed CORS for the frontend origin only.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(HeaderValue::from_static(FRONTEND_ORIGIN))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
