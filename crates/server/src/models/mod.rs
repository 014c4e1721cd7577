//! Domain models.

pub mod account;
pub mod session;

pub use account::{Account, AccountSummary, NewAccount};
pub use session::keys as session_keys;
