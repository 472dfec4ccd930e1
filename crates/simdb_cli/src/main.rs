//! SimDB CLI
//!
//! Command-line tools for inspecting SimDB documents.
//!
//! # Commands
//!
//! - `entries` - List the entries of an archive
//! - `inspect` - Display envelope metadata
//! - `dump` - Print the records of a document
//! - `verify` - Check record identities

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SimDB command-line document tools.
#[derive(Parser)]
#[command(name = "simdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the entries of an archive
    Entries {
        /// Path to the archive
        archive: PathBuf,
    },

    /// Display envelope metadata and record count
    Inspect {
        /// Path to a document file, or to an archive when --entry is given
        path: PathBuf,

        /// Archive entry to read, e.g. `User.json`
        #[arg(short, long)]
        entry: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the records of a document as JSON
    Dump {
        /// Path to a document file, or to an archive when --entry is given
        path: PathBuf,

        /// Archive entry to read, e.g. `User.json`
        #[arg(short, long)]
        entry: Option<String>,
    },

    /// Check that every record has a unique identity
    Verify {
        /// Path to a document file, or to an archive when --entry is given
        path: PathBuf,

        /// Archive entry to read, e.g. `User.json`
        #[arg(short, long)]
        entry: Option<String>,
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
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Entries { archive } => {
            commands::entries::run(&archive)?;
        }
        Commands::Inspect {
            path,
            entry,
            format,
        } => {
            commands::inspect::run(&path, entry.as_deref(), &format)?;
        }
        Commands::Dump { path, entry } => {
            commands::dump::run(&path, entry.as_deref())?;
        }
        Commands::Verify { path, entry } => {
            commands::verify::run(&path, entry.as_deref())?;
        }
        Commands::Version => {
            println!("SimDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("SimDB Core v{}", simdb_core::VERSION);
        }
    }

    Ok(())
}
