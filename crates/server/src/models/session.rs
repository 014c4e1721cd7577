//! Session-related types.

/// Session keys for authentication data.
pub mod keys {
    /// Key for the logged-in account's id.
    pub const ACCOUNT_ID: &str = "_account_id";
}
