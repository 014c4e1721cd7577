//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Responses are JSON
//! `{"message": ...}`; server-side failures are captured to Sentry and their
//! details are never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Body of every 401 produced for a missing or stale session.
pub const AUTHENTICATION_REQUIRED: &str = "Autenticación requerida.";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Request is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidEmail(_) => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::AccountInactive => StatusCode::FORBIDDEN,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message.
    fn message(&self) -> String {
        match self {
            Self::Database(_) | Self::Session(_) => "Error interno del servidor.".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidEmail(_) => {
                    "Credenciales inválidas.".to_string()
                }
                AuthError::AccountInactive => "La cuenta está inactiva.".to_string(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Error interno del servidor.".to_string()
                }
            },
            Self::Unauthorized => AUTHENTICATION_REQUIRED.to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a successful login.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
