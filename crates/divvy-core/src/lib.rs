//! Divvy Core Library
//!
//! Shared functionality for the divvy receipt-splitting tool:
//! - Field classification and token parsing for extraction output
//! - Receipt normalization (line items, summary reconciliation)
//! - Cost allocation across an item/person assignment graph
//! - Numeric hygiene for persisted values
//! - SQLite persistence for saved breakdowns

pub mod breakdown;
pub mod db;
pub mod error;
pub mod fields;
pub mod hygiene;
pub mod models;
pub mod parser;

pub use breakdown::{AssignmentOutcome, CostAllocator};
pub use db::Database;
pub use error::{Error, Result};
pub use fields::{
    classify_label, normalize_date, parse_price_token, FieldRole, ITEM_ROLES, SUMMARY_ROLES,
};
pub use hygiene::{finite_or_zero, round2};
pub use models::{
    ExpenseDocument, ExtractedField, ExtractionOutput, ItemAssignment, LineItem, LineItemGroup,
    Person, PersonBreakdown, Receipt, ReceiptBreakdown, ReceiptItem, ReceiptSummary, SplitRequest,
};
pub use parser::{ReceiptParser, UNKNOWN_MERCHANT};
