//! # Arcstore - Graph Table CLI
//!
//! Command-line tool for a directed graph stored in a wide-column
//! table: one row per edge, composite primary key (source, target),
//! and a reverse-search index for target-side lookups.
//!
//! ## Usage
//!
//! ```bash
//! # Create the table (asks before replacing an existing one)
//! arcstore init
//!
//! # Page through every stored edge
//! arcstore read --limit 50
//!
//! # Import edges from CSV ('source' and 'target' columns are the key)
//! arcstore load edges.csv
//!
//! # Delete the table and its data
//! arcstore drop
//! ```
//!
//! The store is selected with `--backend`: `http` speaks the
//! wide-column JSON wire protocol against `--endpoint` (a local
//! emulator by default), `redb` uses an embedded database file.

mod cli;
mod client;
mod input;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing — ARCSTORE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("ARCSTORE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "arcstore=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let args = cli::Cli::parse();

    if let Err(e) = cli::execute(args) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
