//! Breakdown computation command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use divvy_core::{CostAllocator, SplitRequest};
use tracing::debug;

use super::open_db;

pub fn cmd_split(db_path: &Path, file: &Path, user: &str, save: bool) -> Result<()> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let request: SplitRequest = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid split request JSON in {}", file.display()))?;

    debug!(
        items = request.items.len(),
        people = request.people.len(),
        assignments = request.assignments.len(),
        "computing breakdown"
    );
    let breakdown = CostAllocator::new().build_breakdown(user, &request);

    println!("{}", serde_json::to_string_pretty(&breakdown)?);

    if save {
        let db = open_db(db_path)?;
        db.save_breakdown(&breakdown)
            .context("Failed to save breakdown")?;
        println!("✅ Saved breakdown {} for {}", breakdown.id, user);
    }

    Ok(())
}
