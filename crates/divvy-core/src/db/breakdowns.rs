//! Saved receipt breakdown operations

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{PersonBreakdown, ReceiptBreakdown};

const BREAKDOWN_COLUMNS: &str = "id, user_id, merchant_name, date, subtotal, tax, tip, total,
             user_paid, people_breakdown, created_at";

impl Database {
    /// Save a computed breakdown
    pub fn save_breakdown(&self, breakdown: &ReceiptBreakdown) -> Result<()> {
        let conn = self.conn()?;
        let people_json = serde_json::to_string(&breakdown.people_breakdown)?;

        conn.execute(
            "INSERT INTO breakdowns (id, user_id, merchant_name, date, subtotal, tax, tip,
             total, user_paid, people_breakdown, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                breakdown.id,
                breakdown.user_id,
                breakdown.merchant_name,
                breakdown.date,
                breakdown.subtotal,
                breakdown.tax,
                breakdown.tip,
                breakdown.total,
                breakdown.user_paid,
                people_json,
                breakdown.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ],
        )?;
        Ok(())
    }

    /// Get all breakdowns for a user, newest first
    pub fn get_breakdowns_for_user(&self, user_id: &str) -> Result<Vec<ReceiptBreakdown>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM breakdowns WHERE user_id = ? ORDER BY created_at DESC, id DESC",
            BREAKDOWN_COLUMNS
        ))?;

        let breakdowns = stmt
            .query_map(params![user_id], |row| Self::row_to_breakdown(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(breakdowns)
    }

    /// Get breakdowns for a user within a date range, newest first.
    ///
    /// Bounds are inclusive. Dates are canonical fixed-width `YYYY-MM-DD`,
    /// so SQLite's lexicographic TEXT comparison is a correct date compare.
    pub fn get_breakdowns_by_date_range(
        &self,
        user_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<ReceiptBreakdown>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM breakdowns
             WHERE user_id = ? AND date BETWEEN ? AND ?
             ORDER BY created_at DESC, id DESC",
            BREAKDOWN_COLUMNS
        ))?;

        let breakdowns = stmt
            .query_map(params![user_id, start_date, end_date], |row| {
                Self::row_to_breakdown(row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(breakdowns)
    }

    /// Delete one of a user's breakdowns
    pub fn delete_breakdown(&self, user_id: &str, id: &str) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM breakdowns WHERE user_id = ? AND id = ?",
            params![user_id, id],
        )?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("Breakdown not found: {}", id)));
        }
        Ok(())
    }

    /// Helper to convert a row to ReceiptBreakdown
    fn row_to_breakdown(row: &rusqlite::Row) -> rusqlite::Result<ReceiptBreakdown> {
        let people_json: String = row.get(9)?;
        let created_at_str: String = row.get(10)?;

        // Lenient on corrupted JSON, same as elsewhere: an unreadable share
        // list degrades to empty rather than failing the whole query.
        let people_breakdown: Vec<PersonBreakdown> =
            serde_json::from_str(&people_json).unwrap_or_default();

        Ok(ReceiptBreakdown {
            id: row.get(0)?,
            user_id: row.get(1)?,
            merchant_name: row.get(2)?,
            date: row.get(3)?,
            subtotal: row.get(4)?,
            tax: row.get(5)?,
            tip: row.get(6)?,
            total: row.get(7)?,
            user_paid: row.get(8)?,
            people_breakdown,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
