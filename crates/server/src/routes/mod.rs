//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health         - Liveness check
//! GET    /health/ready   - Readiness check (database reachable)
//!
//! # API (nested under /api)
//! POST   /api/login      - Password login, starts a session
//! GET    /api/session    - Current account (requires auth)
//! DELETE /api/session    - Logout (requires auth)
//! ```

pub mod health;
pub mod session;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the API router, to be nested under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(session::login))
        .route("/session", get(session::current).delete(session::logout))
}

/// Create the health check router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
}
