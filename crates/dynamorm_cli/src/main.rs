//! dynamorm CLI
//!
//! Command-line access to a repository backed by an in-memory store that is
//! persisted as a JSON snapshot between invocations.
//!
//! # Commands
//!
//! - `create-table` - Add a table with its key schema
//! - `tables` - List tables and item counts
//! - `get` - Load a document by key
//! - `create` - Save a new document
//! - `update` - Replace an existing document
//! - `plan` - Show the writes a save would perform

mod commands;

use clap::{Parser, Subcommand};
use dynamorm_core::WriteIntent;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// dynamorm command-line repository tools.
#[derive(Parser)]
#[command(name = "dynamorm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store snapshot file
    #[arg(global = true, short, long)]
    store: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a table with its key schema
    CreateTable {
        /// Table name
        table: String,

        /// Key attribute names, partition key first
        #[arg(short, long = "key", required = true, num_args = 1..=2)]
        keys: Vec<String>,
    },

    /// List tables and item counts
    Tables,

    /// Load a document by key
    Get {
        /// Table name
        table: String,

        /// Key attributes as NAME=VALUE
        #[arg(short, long = "key", required = true)]
        keys: Vec<String>,

        /// Request a strongly consistent read
        #[arg(long)]
        consistent: bool,
    },

    /// Save a new document; fails if its key is taken
    Create {
        /// Table name
        table: String,

        /// Document as a JSON object
        document: String,
    },

    /// Replace an existing document; fails if its key is absent
    Update {
        /// Table name
        table: String,

        /// Document as a JSON object
        document: String,
    },

    /// Show the writes a save would perform, without performing them
    Plan {
        /// Table name
        table: String,

        /// Document as a JSON object
        document: String,

        /// Plan an update instead of a create
        #[arg(short, long)]
        update: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::CreateTable { table, keys } => {
            let path = cli.store.ok_or("Store path required for create-table")?;
            commands::table::create(&path, &table, &keys)?;
        }
        Commands::Tables => {
            let path = cli.store.ok_or("Store path required for tables")?;
            commands::table::list(&path)?;
        }
        Commands::Get {
            table,
            keys,
            consistent,
        } => {
            let path = cli.store.ok_or("Store path required for get")?;
            let output = commands::document::get(&path, &table, &keys, consistent)?;
            println!("{output}");
        }
        Commands::Create { table, document } => {
            let path = cli.store.ok_or("Store path required for create")?;
            commands::document::save(&path, &table, &document, WriteIntent::Create)?;
            println!("Created");
        }
        Commands::Update { table, document } => {
            let path = cli.store.ok_or("Store path required for update")?;
            commands::document::save(&path, &table, &document, WriteIntent::Update)?;
            println!("Updated");
        }
        Commands::Plan {
            table,
            document,
            update,
        } => {
            let path = cli.store.ok_or("Store path required for plan")?;
            let intent = if update {
                WriteIntent::Update
            } else {
                WriteIntent::Create
            };
            let output = commands::document::plan(&path, &table, &document, intent)?;
            println!("{output}");
        }
        Commands::Version => {
            println!("dynamorm CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
