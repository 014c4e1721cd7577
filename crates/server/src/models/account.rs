//! Account domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tax_simulator_core::{AccountId, AccountStatus, DocumentType, Email};

/// A registered account (domain type).
///
/// The password digest is deliberately absent; it is only ever read
/// alongside the account during login.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Display name.
    pub full_name: String,
    /// Identity document kind.
    pub document_type: DocumentType,
    /// Identity document number.
    pub document_number: String,
    /// Login email address.
    pub email: Email,
    /// Whether the account may sign in.
    pub status: AccountStatus,
    /// Administrator privilege flag.
    pub is_admin: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Values for inserting a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub full_name: String,
    pub document_type: DocumentType,
    pub document_number: String,
    pub email: Email,
    /// Argon2 PHC string, never the plaintext.
    pub password_hash: String,
    pub status: AccountStatus,
    pub is_admin: bool,
}

/// Public view of an account as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub id: AccountId,
    #[serde(rename = "nombre_completo")]
    pub full_name: String,
    #[serde(rename = "correo_electronico")]
    pub email: Email,
    #[serde(rename = "es_admin")]
    pub is_admin: bool,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            full_name: account.full_name.clone(),
            email: account.email.clone(),
            is_admin: account.is_admin,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_uses_client_field_names() {
        let now = Utc::now();
        let account = Account {
            id: AccountId::new(1),
            full_name: "Administrador".to_string(),
            document_type: DocumentType::Admin,
            document_number: "00000000".to_string(),
            email: Email::parse("admin@example.com").unwrap(),
            status: AccountStatus::Active,
            is_admin: true,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(AccountSummary::from(&account)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "nombre_completo": "Administrador",
                "correo_electronico": "admin@example.com",
                "es_admin": true,
            })
        );
    }
}
