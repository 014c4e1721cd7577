//! Core types for the tax simulator.

pub mod document;
pub mod email;
pub mod id;
pub mod status;

pub use document::{DocumentType, DocumentTypeError};
pub use email::{Email, EmailError};
pub use id::*;
pub use status::{AccountStatus, AccountStatusError};
