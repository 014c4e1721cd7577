//! Identity document types.

use serde::{Deserialize, Serialize};

/// Error returned for an unrecognized document type label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid document type: {0}")]
pub struct DocumentTypeError(pub String);

/// Kind of identity document an account is registered with.
///
/// Together with the document number this forms the account's natural key.
/// `Admin` is reserved for the seeded administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "Cedula")]
    NationalId,
    #[serde(rename = "Tarjeta de identidad")]
    IdentityCard,
    #[serde(rename = "Pasaporte")]
    Passport,
    #[serde(rename = "Cedula de extranjería")]
    ForeignerId,
}

impl DocumentType {
    /// Storage/wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::NationalId => "Cedula",
            Self::IdentityCard => "Tarjeta de identidad",
            Self::Passport => "Pasaporte",
            Self::ForeignerId => "Cedula de extranjería",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = DocumentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "Cedula" => Ok(Self::NationalId),
            "Tarjeta de identidad" => Ok(Self::IdentityCard),
            "Pasaporte" => Ok(Self::Passport),
            "Cedula de extranjería" => Ok(Self::ForeignerId),
            _ => Err(DocumentTypeError(s.to_owned())),
        }
    }
}
