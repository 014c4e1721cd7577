//! Tax Simulator Core - Shared types library.
//!
//! This crate provides the domain types used by the tax simulator components:
//! - `server` - HTTP API (application factory, sessions, seeding)
//! - `cli` - Command-line tools for schema creation and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. This keeps it lightweight and usable from every crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids and emails, plus account enumerations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
