//! Tax simulator CLI - database maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Create any missing tables (sessions and accounts)
//! tax-cli schema
//!
//! # Create missing tables, then ensure the default administrator exists
//! tax-cli seed-admin
//! ```
//!
//! Both commands read the same environment variables as the server
//! (`DATABASE_URL`, `INSTANCE_PATH`, ...), including a `.env` file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tax-cli")]
#[command(author, version, about = "Tax simulator CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing database tables, including the session table
    Schema,
    /// Ensure the default administrator account exists
    SeedAdmin,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Schema => commands::schema::run().await,
        Commands::SeedAdmin => commands::seed::admin().await,
    }
}
