//! Extraction document normalization command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use divvy_core::{ExtractionOutput, ReceiptParser};

pub fn cmd_parse(file: &Path, output: Option<&Path>) -> Result<()> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let extraction: ExtractionOutput = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid extraction JSON in {}", file.display()))?;

    let receipt = ReceiptParser::new()
        .parse(&extraction)
        .context("Failed to normalize extraction document")?;

    let json = serde_json::to_string_pretty(&receipt)?;
    match output {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "✅ Normalized receipt from {} ({} items) -> {}",
                receipt.merchant_name,
                receipt.items.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
