//! Data models for divvy
//!
//! Two families of types live here:
//! - Extraction input: the loosely-typed field bags handed over by the
//!   OCR/field-extraction collaborator (`ExtractionOutput` down to
//!   `ExtractedField`).
//! - Canonical records: the normalized `Receipt`, the split-side inputs
//!   (`Person`, `ItemAssignment`), and the computed `ReceiptBreakdown`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ========== Extraction Input ==========

/// A single detected key/value field from the extraction collaborator.
///
/// `label` is free text in a vendor-defined vocabulary (arbitrary casing);
/// classification into canonical roles is heuristic, see `fields`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedField {
    pub label: String,
    /// Detected text for the field value (may be empty or garbage)
    pub value: String,
}

/// One line item as detected: an unclassified bag of fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub fields: Vec<ExtractedField>,
}

/// A group of detected line items (receipts can have several item tables)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemGroup {
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

/// A single expense document within the extraction output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseDocument {
    /// Document-level fields (merchant, totals, date)
    #[serde(default)]
    pub summary_fields: Vec<ExtractedField>,
    /// Grouped line-item fields
    #[serde(default)]
    pub line_item_groups: Vec<LineItemGroup>,
}

/// Top-level extraction collaborator output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    #[serde(default)]
    pub documents: Vec<ExpenseDocument>,
}

// ========== Canonical Receipt ==========

/// A purchased line item on a normalized receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Unique within the receipt (UUID v4)
    pub id: String,
    pub name: String,
    /// Total price for the line, already quantity-multiplied
    pub price: f64,
    /// Informational only; price is not per-unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// A normalized receipt, immutable once produced by the parser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    /// Falls back to "Unknown Merchant" when undetected
    pub merchant_name: String,
    /// Detection order; not semantically significant
    pub items: Vec<ReceiptItem>,
    pub subtotal: f64,
    pub tax: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<f64>,
    pub total: f64,
    /// Canonical `YYYY-MM-DD` when detected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

// ========== Split Inputs ==========

/// A member of the group splitting a receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique within a group
    pub id: String,
    pub name: String,
}

/// Maps one item to the set of people sharing its cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemAssignment {
    /// Must reference a `ReceiptItem.id` to have any effect
    pub item_id: String,
    pub person_ids: Vec<String>,
    /// Informational marker for "all current group members"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_everyone: Option<bool>,
}

/// Receipt summary values carried alongside a split request
///
/// This is the edited-by-the-user view of the receipt, not necessarily the
/// parser output verbatim, so totals arrive as plain numbers again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptSummary {
    pub merchant_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub subtotal: f64,
    pub tax: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

/// Everything the allocation engine needs for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRequest {
    pub receipt: ReceiptSummary,
    pub items: Vec<ReceiptItem>,
    pub people: Vec<Person>,
    pub assignments: Vec<ItemAssignment>,
}

// ========== Breakdown Output ==========

/// One person's share of a receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonBreakdown {
    pub person_id: String,
    /// Denormalized copy, not a live reference
    pub person_name: String,
    /// Item share plus proportional tax/tip; always finite and >= 0
    pub amount_owed: f64,
}

/// A computed allocation run, write-once from the engine's perspective
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptBreakdown {
    pub id: String,
    /// Owner/partition key for persistence queries
    pub user_id: String,
    pub merchant_name: String,
    /// Canonical `YYYY-MM-DD`; defaults to the run date when undetected
    pub date: String,
    pub subtotal: f64,
    pub tax: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    /// Sum of all amounts owed back to the payer
    pub user_paid: f64,
    /// One entry per input person, in input order
    pub people_breakdown: Vec<PersonBreakdown>,
    pub created_at: DateTime<Utc>,
}
