//! Divvy CLI - Split itemized receipts across a group
//!
//! Usage:
//!   divvy init                      Initialize database
//!   divvy parse --file out.json     Normalize an extraction document
//!   divvy split --file req.json     Compute a breakdown (--save to persist)
//!   divvy history --user ID         List saved breakdowns
//!   divvy delete --user ID --id ID  Delete a saved breakdown

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Parse { file, output } => commands::cmd_parse(&file, output.as_deref()),
        Commands::Split { file, user, save } => {
            commands::cmd_split(&cli.db, &file, &user, save)
        }
        Commands::History { user, from, to } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_history(&db, &user, from.as_deref(), to.as_deref())
        }
        Commands::Delete { user, id } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_delete(&db, &user, &id)
        }
    }
}
