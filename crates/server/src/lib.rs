//! Tax simulator API server library.
//!
//! Bootstrap layer of the tax simulator backend: configuration, `SQLite`
//! persistence, signed cookie sessions with a login manager, CORS for the
//! web frontend and the default administrator seed. The binary and the CLI
//! both build on this crate so the same startup path is exercised in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;

pub use app::{App, StartupError, build_app, create_app};
pub use config::AppConfig;
