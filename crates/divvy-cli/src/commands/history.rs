//! Saved breakdown listing and deletion commands

use anyhow::{bail, Context, Result};
use divvy_core::db::Database;

pub fn cmd_history(
    db: &Database,
    user: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let breakdowns = match (from, to) {
        (Some(from), Some(to)) => db
            .get_breakdowns_by_date_range(user, from, to)
            .context("Failed to query breakdowns")?,
        (None, None) => db
            .get_breakdowns_for_user(user)
            .context("Failed to query breakdowns")?,
        _ => bail!("--from and --to must be given together"),
    };

    if breakdowns.is_empty() {
        println!("No saved breakdowns for {}", user);
        return Ok(());
    }

    for b in &breakdowns {
        println!(
            "{}  {}  {}  ${:.2} across {} people  (id {})",
            b.date,
            b.merchant_name,
            b.total.map_or("-".to_string(), |t| format!("${:.2}", t)),
            b.user_paid,
            b.people_breakdown.len(),
            b.id
        );
        for person in &b.people_breakdown {
            println!("    {} owes ${:.2}", person.person_name, person.amount_owed);
        }
    }

    Ok(())
}

pub fn cmd_delete(db: &Database, user: &str, id: &str) -> Result<()> {
    db.delete_breakdown(user, id)
        .with_context(|| format!("Failed to delete breakdown {}", id))?;
    println!("✅ Deleted breakdown {}", id);
    Ok(())
}
