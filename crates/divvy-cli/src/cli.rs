//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Divvy - Split itemized receipts across a group
#[derive(Parser)]
#[command(name = "divvy")]
#[command(about = "Normalize extracted receipts and split costs across a group", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "divvy.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Normalize a field-extraction document into a canonical receipt
    Parse {
        /// Extraction output JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Write the receipt JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute a breakdown from a split request
    Split {
        /// Split request JSON file (receipt summary, items, people, assignments)
        #[arg(short, long)]
        file: PathBuf,

        /// Owner of the saved breakdown
        #[arg(short, long, default_value = "local")]
        user: String,

        /// Save the breakdown to the database
        #[arg(long)]
        save: bool,
    },

    /// List saved breakdowns
    History {
        /// Owner whose breakdowns to list
        #[arg(short, long, default_value = "local")]
        user: String,

        /// Start date (YYYY-MM-DD, inclusive; requires --to)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, inclusive; requires --from)
        #[arg(long)]
        to: Option<String>,
    },

    /// Delete a saved breakdown
    Delete {
        /// Owner of the breakdown
        #[arg(short, long, default_value = "local")]
        user: String,

        /// Breakdown id
        #[arg(long)]
        id: String,
    },
}
