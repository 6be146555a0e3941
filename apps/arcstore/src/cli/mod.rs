//! # Arcstore CLI Module
//!
//! ## Available Commands
//!
//! - `init` - Create the graph table; asks before replacing an existing one
//! - `read` - Page through stored edges, with optional key filters
//! - `load` - Import CSV files, one put per row
//! - `drop` - Delete the table and all of its data

mod commands;

use crate::client::HttpStore;
use crate::input::Input;
use arcstore_core::{GraphTable, RedbStore, StoreClient, StoreError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Arcstore - directed graph edges on a wide-column table store.
#[derive(Parser, Debug)]
#[command(name = "arcstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Name of the table to work against
    #[arg(short, long, global = true, default_value = "example-table")]
    pub table: String,

    /// Endpoint of the table service (http backend)
    #[arg(short, long, global = true, default_value = "http://localhost:8000")]
    pub endpoint: String,

    /// Region the table lives in (http backend)
    #[arg(short, long, global = true, default_value = "us-east-1")]
    pub region: String,

    /// Store backend: "http" (remote table service) or "redb" (embedded)
    #[arg(short = 'B', long, global = true, default_value = "http")]
    pub backend: String,

    /// Path of the embedded database (redb backend)
    #[arg(short = 'D', long, global = true, default_value = "arcstore.redb")]
    pub database: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the graph table. Asks to delete and replace an existing one.
    Init {
        /// Replace an existing table without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Read entries out of the graph table
    Read {
        /// Records per page
        #[arg(short, long, default_value = "100")]
        limit: u32,

        /// Only show edges leaving this source node
        #[arg(short, long)]
        source: Option<String>,

        /// Only show edges arriving at this destination node
        #[arg(short, long)]
        destination: Option<String>,
    },

    /// Load CSV files into the graph table, one put per row
    Load {
        /// CSV files to import; a 'source' and a 'target' column are required
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete the table and all of its data
    Drop {
        /// Delete without asking
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// CLI ERRORS
// =============================================================================

/// Errors surfaced by CLI commands: table/store failures plus the glue
/// concerns (file I/O, CSV shape, user input) the core never sees.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Input(String),
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), CliError> {
    let Cli {
        table,
        endpoint,
        region,
        backend,
        database,
        command,
    } = cli;

    match backend.as_str() {
        "http" => run(GraphTable::new(HttpStore::new(endpoint, region), table), command),
        "redb" => run(GraphTable::new(RedbStore::open(&database)?, table), command),
        other => Err(CliError::Input(format!(
            "unknown backend '{other}'. Use: http, redb"
        ))),
    }
}

fn run<C: StoreClient>(table: GraphTable<C>, command: Commands) -> Result<(), CliError> {
    let mut input = Input::new();

    match command {
        Commands::Init { force } => commands::cmd_init(&table, &mut input, force),
        Commands::Read {
            limit,
            source,
            destination,
        } => commands::cmd_read(&table, &mut input, limit, source, destination),
        Commands::Load { files } => commands::cmd_load(&table, &files),
        Commands::Drop { force } => commands::cmd_drop(&table, &mut input, force),
    }
}
