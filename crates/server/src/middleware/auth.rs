//! Authentication extractors and session helpers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use tax_simulator_core::AccountId;

use crate::error::AppError;
use crate::models::{Account, session_keys};
use crate::state::AppState;

/// Extractor that requires a logged-in account.
///
/// The session's account id is resolved through the registered account
/// loader. A missing id or an id that no longer resolves produces the
/// registered unauthorized response.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(account): RequireAuth) -> impl IntoResponse {
///     format!("Hola, {}!", account.full_name)
/// }
/// ```
pub struct RequireAuth(pub Account);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let manager = state.login_manager();

        let Some(session) = parts.extensions.get::<Session>() else {
            return Err(manager.unauthorized());
        };

        // A session read failure is treated like an absent login.
        let account_id: Option<AccountId> = session
            .get(session_keys::ACCOUNT_ID)
            .await
            .ok()
            .flatten();
        let Some(account_id) = account_id else {
            return Err(manager.unauthorized());
        };

        match manager.load_account(state.pool(), account_id).await {
            Ok(Some(account)) => Ok(Self(account)),
            Ok(None) => {
                tracing::debug!(%account_id, "Session refers to a missing account");
                Err(manager.unauthorized())
            }
            Err(e) => Err(AppError::Database(e).into_response()),
        }
    }
}

/// Store the account id in the session, rotating the session id first.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub async fn login_account(
    session: &Session,
    account_id: AccountId,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::ACCOUNT_ID, account_id).await
}

/// Drop the whole session (logout).
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub async fn logout_account(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
