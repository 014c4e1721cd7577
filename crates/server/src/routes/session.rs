//! Login, current-session and logout handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, login_account, logout_account};
use crate::models::AccountSummary;
use crate::services::AuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub correo_electronico: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: AccountSummary,
}

/// Current session response.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: AccountSummary,
}

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Handle password login.
///
/// POST /api/login
#[tracing::instrument(skip(state, session, payload))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Malformed login body");
        AppError::BadRequest("Se requieren correo electrónico y contraseña.".to_string())
    })?;

    let account = AuthService::new(state.pool())
        .login_with_password(&request.correo_electronico, &request.password)
        .await
        .inspect_err(|e| tracing::info!(error = %e, "Login rejected"))?;

    login_account(&session, account.id).await?;
    set_sentry_user(&account.id, Some(account.email.as_str()));
    tracing::info!(account_id = %account.id, "Account logged in");

    Ok(Json(LoginResponse {
        message: "Inicio de sesión exitoso.",
        user: AccountSummary::from(&account),
    }))
}

/// Return the logged-in account.
///
/// GET /api/session
pub async fn current(RequireAuth(account): RequireAuth) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: AccountSummary::from(&account),
    })
}

/// End the current session.
///
/// DELETE /api/session
pub async fn logout(
    RequireAuth(account): RequireAuth,
    session: Session,
) -> Result<Json<MessageResponse>> {
    logout_account(&session).await?;
    clear_sentry_user();
    tracing::info!(account_id = %account.id, "Account logged out");

    Ok(Json(MessageResponse {
        message: "Sesión cerrada.",
    }))
}
