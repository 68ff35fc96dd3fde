//! Receipt normalization
//!
//! Turns the extraction collaborator's loosely-typed field bags into a
//! canonical `Receipt`: line items are assembled from classified fields,
//! summary values are reconciled when missing or contradictory, and every
//! monetary output is rounded to cents.
//!
//! The only fatal case is an extraction response with no document at all;
//! everything below that degrades to defaults rather than erroring, because
//! OCR text is unreliable and one bad field must not sink the receipt.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::fields::{
    classify_label, normalize_date, parse_price_token, FieldRole, ITEM_ROLES, SUMMARY_ROLES,
};
use crate::hygiene::{finite_or_zero, round2};
use crate::models::{ExpenseDocument, ExtractionOutput, Receipt, ReceiptItem};

/// Sentinel for receipts where no merchant field was detected
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// Document-level summary values after classification and reconciliation
struct ReceiptSummaryFields {
    merchant_name: String,
    subtotal: f64,
    tax: f64,
    tip: Option<f64>,
    total: f64,
    date: Option<String>,
}

/// Normalizes extraction output into canonical receipts
pub struct ReceiptParser;

impl ReceiptParser {
    pub fn new() -> Self {
        Self
    }

    /// Normalize the first expense document into a `Receipt`.
    ///
    /// Fails only when the extraction output contains no document; every
    /// other defect degrades to a default (see `fields`).
    pub fn parse(&self, output: &ExtractionOutput) -> Result<Receipt> {
        let doc = output.documents.first().ok_or(Error::EmptyDocument)?;

        let items = self.assemble_line_items(doc);
        let summary = self.reconcile_summary(doc);

        Ok(Receipt {
            id: Uuid::new_v4().to_string(),
            merchant_name: summary.merchant_name,
            items,
            subtotal: summary.subtotal,
            tax: summary.tax,
            tip: summary.tip,
            total: summary.total,
            date: summary.date,
        })
    }

    /// Assemble purchased items from the grouped line-item fields.
    ///
    /// A line becomes an item only with a non-empty classified name and a
    /// strictly positive classified price; anything else is discarded.
    fn assemble_line_items(&self, doc: &ExpenseDocument) -> Vec<ReceiptItem> {
        let mut items = Vec::new();

        for group in &doc.line_item_groups {
            for line_item in &group.line_items {
                let mut name = String::new();
                let mut price = 0.0;

                for field in &line_item.fields {
                    match classify_label(&field.label, ITEM_ROLES) {
                        Some(FieldRole::ItemName) => name = field.value.clone(),
                        Some(FieldRole::ItemPrice) => price = parse_price_token(&field.value),
                        _ => {}
                    }
                }

                if !name.is_empty() && price > 0.0 {
                    items.push(ReceiptItem {
                        id: Uuid::new_v4().to_string(),
                        name,
                        price,
                        quantity: None,
                    });
                } else {
                    debug!(name = %name, price, "discarding incomplete line item");
                }
            }
        }

        items
    }

    /// Classify the document-level summary fields and reconcile the totals.
    ///
    /// Classification fills a map keyed by role in document order, so a
    /// duplicate classification overwrites the earlier one. Last write wins
    /// is kept deliberately for parity with the source heuristic, quirky as
    /// it is for duplicated fields.
    fn reconcile_summary(&self, doc: &ExpenseDocument) -> ReceiptSummaryFields {
        let mut detected: HashMap<FieldRole, String> = HashMap::new();

        for field in &doc.summary_fields {
            if let Some(role) = classify_label(&field.label, SUMMARY_ROLES) {
                detected.insert(role, field.value.clone());
            }
        }

        let merchant_name = detected
            .get(&FieldRole::Merchant)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| UNKNOWN_MERCHANT.to_string());

        let mut subtotal = detected
            .get(&FieldRole::Subtotal)
            .map_or(0.0, |v| parse_price_token(v));
        let tax = detected
            .get(&FieldRole::Tax)
            .map_or(0.0, |v| parse_price_token(v));
        let tip = detected.get(&FieldRole::Tip).map(|v| parse_price_token(v));
        let mut total = detected
            .get(&FieldRole::Total)
            .map_or(0.0, |v| parse_price_token(v));

        // Undetected totals come through as 0; derive them from the rest.
        if total == 0.0 {
            total = subtotal + tax + tip.unwrap_or(0.0);
        } else if subtotal == 0.0 && total > 0.0 {
            // May go negative when tax/tip were misdetected; accepted as a
            // known data-quality edge rather than corrected here.
            subtotal = total - tax - tip.unwrap_or(0.0);
        }

        let date = detected
            .get(&FieldRole::Date)
            .map(|v| normalize_date(Some(v)));

        ReceiptSummaryFields {
            merchant_name,
            subtotal: round2(finite_or_zero(subtotal)),
            tax: round2(finite_or_zero(tax)),
            tip: tip.map(|t| round2(finite_or_zero(t))),
            total: round2(finite_or_zero(total)),
            date,
        }
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractedField, LineItem, LineItemGroup};

    fn field(label: &str, value: &str) -> ExtractedField {
        ExtractedField {
            label: label.to_string(),
            value: value.to_string(),
        }
    }

    fn line_item(fields: Vec<ExtractedField>) -> LineItem {
        LineItem { fields }
    }

    fn output_with(doc: ExpenseDocument) -> ExtractionOutput {
        ExtractionOutput {
            documents: vec![doc],
        }
    }

    fn sample_document() -> ExpenseDocument {
        ExpenseDocument {
            summary_fields: vec![
                field("VENDOR_NAME", "Luigi's Trattoria"),
                field("SUBTOTAL", "$30.00"),
                field("TAX", "$3.00"),
                field("GRATUITY", "$6.00"),
                field("TOTAL", "$39.00"),
                field("INVOICE_RECEIPT_DATE", "03/15/2024"),
            ],
            line_item_groups: vec![LineItemGroup {
                line_items: vec![
                    line_item(vec![field("ITEM", "Margherita Pizza"), field("PRICE", "$18.00")]),
                    line_item(vec![field("ITEM", "House Salad"), field("PRICE", "$12.00")]),
                ],
            }],
        }
    }

    #[test]
    fn test_parse_empty_output_is_fatal() {
        let parser = ReceiptParser::new();
        let result = parser.parse(&ExtractionOutput { documents: vec![] });
        assert!(matches!(result, Err(Error::EmptyDocument)));
    }

    #[test]
    fn test_parse_full_receipt() {
        let parser = ReceiptParser::new();
        let receipt = parser.parse(&output_with(sample_document())).unwrap();

        assert_eq!(receipt.merchant_name, "Luigi's Trattoria");
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.items[0].name, "Margherita Pizza");
        assert_eq!(receipt.items[0].price, 18.0);
        assert_eq!(receipt.subtotal, 30.0);
        assert_eq!(receipt.tax, 3.0);
        assert_eq!(receipt.tip, Some(6.0));
        assert_eq!(receipt.total, 39.0);
        assert_eq!(receipt.date.as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn test_item_ids_are_unique() {
        let parser = ReceiptParser::new();
        let receipt = parser.parse(&output_with(sample_document())).unwrap();
        assert_ne!(receipt.items[0].id, receipt.items[1].id);
    }

    #[test]
    fn test_total_reconciled_from_components() {
        let parser = ReceiptParser::new();
        let doc = ExpenseDocument {
            summary_fields: vec![
                field("SUBTOTAL", "20.00"),
                field("TAX", "1.50"),
                field("TIP", "4.00"),
            ],
            line_item_groups: vec![],
        };
        let receipt = parser.parse(&output_with(doc)).unwrap();
        assert_eq!(receipt.total, 25.5);
    }

    #[test]
    fn test_subtotal_reconciled_from_total() {
        let parser = ReceiptParser::new();
        let doc = ExpenseDocument {
            summary_fields: vec![field("TAX", "2.00"), field("TOTAL", "22.00")],
            line_item_groups: vec![],
        };
        let receipt = parser.parse(&output_with(doc)).unwrap();
        assert_eq!(receipt.subtotal, 20.0);
        assert_eq!(receipt.total, 22.0);
    }

    #[test]
    fn test_duplicate_summary_field_last_write_wins() {
        let parser = ReceiptParser::new();
        let doc = ExpenseDocument {
            summary_fields: vec![
                field("TAX", "1.00"),
                field("TAX", "2.50"),
                field("SUBTOTAL", "10.00"),
            ],
            line_item_groups: vec![],
        };
        let receipt = parser.parse(&output_with(doc)).unwrap();
        assert_eq!(receipt.tax, 2.5);
    }

    #[test]
    fn test_missing_merchant_gets_sentinel() {
        let parser = ReceiptParser::new();
        let doc = ExpenseDocument {
            summary_fields: vec![field("TOTAL", "5.00")],
            line_item_groups: vec![],
        };
        let receipt = parser.parse(&output_with(doc)).unwrap();
        assert_eq!(receipt.merchant_name, UNKNOWN_MERCHANT);
    }

    #[test]
    fn test_incomplete_line_items_discarded() {
        let parser = ReceiptParser::new();
        let doc = ExpenseDocument {
            summary_fields: vec![],
            line_item_groups: vec![LineItemGroup {
                line_items: vec![
                    // No price field at all
                    line_item(vec![field("ITEM", "Mystery Dish")]),
                    // Price token that doesn't parse -> 0 -> discarded
                    line_item(vec![field("ITEM", "Soup"), field("PRICE", "N/A")]),
                    // No name
                    line_item(vec![field("PRICE", "$4.00")]),
                    // Keeper
                    line_item(vec![field("ITEM", "Garlic Bread"), field("PRICE", "$4.50")]),
                ],
            }],
        };
        let receipt = parser.parse(&output_with(doc)).unwrap();
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].name, "Garlic Bread");
    }

    #[test]
    fn test_unclassified_fields_dropped() {
        let parser = ReceiptParser::new();
        let doc = ExpenseDocument {
            summary_fields: vec![field("ADDRESS_BLOCK", "123 Main St"), field("TOTAL", "9.00")],
            line_item_groups: vec![],
        };
        let receipt = parser.parse(&output_with(doc)).unwrap();
        assert_eq!(receipt.total, 9.0);
        assert_eq!(receipt.merchant_name, UNKNOWN_MERCHANT);
    }

    #[test]
    fn test_item_name_label_classifies_in_item_scope() {
        // "ITEM_NAME" contains the merchant keyword "name"; within a line
        // item only the item keywords may participate, so the line is kept.
        let parser = ReceiptParser::new();
        let doc = ExpenseDocument {
            summary_fields: vec![],
            line_item_groups: vec![LineItemGroup {
                line_items: vec![line_item(vec![
                    field("ITEM_NAME", "Tiramisu"),
                    field("PRICE", "$8.00"),
                ])],
            }],
        };
        let receipt = parser.parse(&output_with(doc)).unwrap();
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].name, "Tiramisu");
        assert_eq!(receipt.items[0].price, 8.0);
    }

    #[test]
    fn test_total_amount_label_classifies_in_summary_scope() {
        // "TOTAL_AMOUNT" contains the item-price keyword "amount"; at the
        // document level only summary keywords may participate.
        let parser = ReceiptParser::new();
        let doc = ExpenseDocument {
            summary_fields: vec![field("TOTAL_AMOUNT", "$21.00"), field("TAX", "$1.00")],
            line_item_groups: vec![],
        };
        let receipt = parser.parse(&output_with(doc)).unwrap();
        assert_eq!(receipt.total, 21.0);
        assert_eq!(receipt.subtotal, 20.0);
    }

    #[test]
    fn test_unparseable_date_falls_back_to_today() {
        let parser = ReceiptParser::new();
        let doc = ExpenseDocument {
            summary_fields: vec![field("INVOICE_RECEIPT_DATE", "garbage")],
            line_item_groups: vec![],
        };
        let receipt = parser.parse(&output_with(doc)).unwrap();
        let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(receipt.date.as_deref(), Some(today.as_str()));
    }
}
