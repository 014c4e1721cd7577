//! Account status.

use serde::{Deserialize, Serialize};

/// Error returned when a stored or submitted status is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid account status: {0}")]
pub struct AccountStatusError(pub String);

/// Whether an account may sign in.
///
/// Stored and serialized with the Spanish labels the web client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountStatus {
    #[default]
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "inactivo")]
    Inactive,
}

impl AccountStatus {
    /// Storage/wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "activo",
            Self::Inactive => "inactivo",
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = AccountStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activo" => Ok(Self::Active),
            "inactivo" => Ok(Self::Inactive),
            _ => Err(AccountStatusError(s.to_owned())),
        }
    }
}
