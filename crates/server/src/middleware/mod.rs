//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. CORS (answers preflights before anything else runs)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `SQLite` store, signed cookie)

pub mod auth;
pub mod session;

pub use auth::{RequireAuth, login_account, logout_account};
pub use session::create_session_layer;
