//! Field classification and token parsing
//!
//! The extraction collaborator hands back free-text field labels and values.
//! This module turns labels into canonical roles and value tokens into
//! numbers and dates. Everything here is lenient: an unrecognizable label is
//! dropped, an unparseable token degrades to a default, never an error.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Canonical role a detected field can classify into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Merchant,
    ItemName,
    ItemPrice,
    Subtotal,
    Tax,
    Tip,
    Total,
    Date,
}

impl FieldRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merchant => "merchant",
            Self::ItemName => "item_name",
            Self::ItemPrice => "item_price",
            Self::Subtotal => "subtotal",
            Self::Tax => "tax",
            Self::Tip => "tip",
            Self::Total => "total",
            Self::Date => "date",
        }
    }
}

impl std::str::FromStr for FieldRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merchant" => Ok(Self::Merchant),
            "item_name" => Ok(Self::ItemName),
            "item_price" => Ok(Self::ItemPrice),
            "subtotal" => Ok(Self::Subtotal),
            "tax" => Ok(Self::Tax),
            "tip" => Ok(Self::Tip),
            "total" => Ok(Self::Total),
            "date" => Ok(Self::Date),
            _ => Err(format!("Unknown field role: {}", s)),
        }
    }
}

/// Roles a line-item field can classify into
pub const ITEM_ROLES: &[FieldRole] = &[FieldRole::ItemName, FieldRole::ItemPrice];

/// Roles a document-level summary field can classify into
pub const SUMMARY_ROLES: &[FieldRole] = &[
    FieldRole::Merchant,
    FieldRole::Subtotal,
    FieldRole::Tax,
    FieldRole::Tip,
    FieldRole::Total,
    FieldRole::Date,
];

/// Ordered (keyword, role) table for label classification.
///
/// Order matters twice: the first containing keyword wins, and `subtotal`
/// must sit ahead of `total` because the label "SUBTOTAL" contains both.
const ROLE_KEYWORDS: &[(&str, FieldRole)] = &[
    ("merchant", FieldRole::Merchant),
    ("vendor", FieldRole::Merchant),
    ("name", FieldRole::Merchant),
    ("item", FieldRole::ItemName),
    ("description", FieldRole::ItemName),
    ("price", FieldRole::ItemPrice),
    ("amount", FieldRole::ItemPrice),
    ("subtotal", FieldRole::Subtotal),
    ("tax", FieldRole::Tax),
    ("tip", FieldRole::Tip),
    ("gratuity", FieldRole::Tip),
    ("total", FieldRole::Total),
    ("date", FieldRole::Date),
];

/// Classify a free-text field label into one of the caller's allowed roles.
///
/// Substring containment against the ordered keyword table, case-insensitive,
/// with only in-scope keywords participating in first-match: a line-item
/// label like "ITEM_NAME" must classify as the item name, not trip over the
/// merchant keyword "name". Labels matching no in-scope keyword return
/// `None` and get dropped by callers.
pub fn classify_label(label: &str, allowed: &[FieldRole]) -> Option<FieldRole> {
    let label = label.to_lowercase();
    ROLE_KEYWORDS
        .iter()
        .filter(|(_, role)| allowed.contains(role))
        .find(|(keyword, _)| label.contains(keyword))
        .map(|(_, role)| *role)
}

/// Parse a free-text currency token into an amount.
///
/// Strips `$` and thousands separators, trims, parses as decimal. Returns
/// `0.0` when the remainder is not a number: extraction text is unreliable
/// and a bad token must not abort the whole receipt.
pub fn parse_price_token(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned.trim().parse::<f64>().unwrap_or(0.0)
}

/// Date formats attempted in order when normalizing a detected date token
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Normalize an optional free-text date token to canonical `YYYY-MM-DD`.
///
/// Absent or unparseable tokens fall back to the current date, so the output
/// is always a syntactically valid date string, never absent.
pub fn normalize_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date_token)
        .unwrap_or_else(|| Utc::now().date_naive())
        .format("%Y-%m-%d")
        .to_string()
}

/// Try the known receipt date formats in order; time-of-day and zone are
/// discarded by construction (formats are date-only).
fn parse_date_token(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_summary_labels() {
        assert_eq!(
            classify_label("VENDOR_NAME", SUMMARY_ROLES),
            Some(FieldRole::Merchant)
        );
        assert_eq!(
            classify_label("Merchant", SUMMARY_ROLES),
            Some(FieldRole::Merchant)
        );
        assert_eq!(classify_label("TAX", SUMMARY_ROLES), Some(FieldRole::Tax));
        assert_eq!(
            classify_label("Gratuity", SUMMARY_ROLES),
            Some(FieldRole::Tip)
        );
        assert_eq!(
            classify_label("TOTAL", SUMMARY_ROLES),
            Some(FieldRole::Total)
        );
        assert_eq!(
            classify_label("INVOICE_RECEIPT_DATE", SUMMARY_ROLES),
            Some(FieldRole::Date)
        );
    }

    #[test]
    fn test_classify_item_labels() {
        assert_eq!(classify_label("ITEM", ITEM_ROLES), Some(FieldRole::ItemName));
        assert_eq!(
            classify_label("Description", ITEM_ROLES),
            Some(FieldRole::ItemName)
        );
        assert_eq!(
            classify_label("PRICE", ITEM_ROLES),
            Some(FieldRole::ItemPrice)
        );
        assert_eq!(
            classify_label("AMOUNT_PAID", ITEM_ROLES),
            Some(FieldRole::ItemPrice)
        );
    }

    #[test]
    fn test_classify_label_subtotal_before_total() {
        // "SUBTOTAL" contains "total"; the table order must pick subtotal
        assert_eq!(
            classify_label("SUBTOTAL", SUMMARY_ROLES),
            Some(FieldRole::Subtotal)
        );
        assert_eq!(
            classify_label("SubTotal", SUMMARY_ROLES),
            Some(FieldRole::Subtotal)
        );
    }

    #[test]
    fn test_classify_label_unknown_dropped() {
        assert_eq!(classify_label("ADDRESS_BLOCK", SUMMARY_ROLES), None);
        assert_eq!(classify_label("", SUMMARY_ROLES), None);
        assert_eq!(classify_label("ADDRESS_BLOCK", ITEM_ROLES), None);
    }

    #[test]
    fn test_classify_label_only_in_scope_keywords_participate() {
        // "ITEM_NAME" contains the merchant keyword "name", but in the
        // line-item context only item keywords are in play.
        assert_eq!(
            classify_label("ITEM_NAME", ITEM_ROLES),
            Some(FieldRole::ItemName)
        );
        // "TOTAL_AMOUNT" contains the item-price keyword "amount"; in the
        // summary context it must land on total.
        assert_eq!(
            classify_label("TOTAL_AMOUNT", SUMMARY_ROLES),
            Some(FieldRole::Total)
        );
        // A bare "AMOUNT" is meaningless at the summary level and drops.
        assert_eq!(classify_label("AMOUNT", SUMMARY_ROLES), None);
    }

    #[test]
    fn test_classify_label_first_keyword_wins_within_scope() {
        // Contains both "name" (merchant) and "item"; in summary scope the
        // merchant keyword sits first, in item scope only "item" matters.
        assert_eq!(
            classify_label("NAME_OF_ITEM", SUMMARY_ROLES),
            Some(FieldRole::Merchant)
        );
        assert_eq!(
            classify_label("NAME_OF_ITEM", ITEM_ROLES),
            Some(FieldRole::ItemName)
        );
    }

    #[test]
    fn test_parse_price_token() {
        assert_eq!(parse_price_token(" $1,234.50 "), 1234.50);
        assert_eq!(parse_price_token("$12.99"), 12.99);
        assert_eq!(parse_price_token("7"), 7.0);
        assert_eq!(parse_price_token("N/A"), 0.0);
        assert_eq!(parse_price_token(""), 0.0);
        assert_eq!(parse_price_token("$"), 0.0);
    }

    #[test]
    fn test_normalize_date_formats() {
        assert_eq!(normalize_date(Some("03/15/2024")), "2024-03-15");
        assert_eq!(normalize_date(Some("2024-03-15")), "2024-03-15");
        assert_eq!(normalize_date(Some("03-15-2024")), "2024-03-15");
        assert_eq!(normalize_date(Some("March 15, 2024")), "2024-03-15");
    }

    #[test]
    fn test_normalize_date_fallback_is_today() {
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(normalize_date(Some("garbage")), today);
        assert_eq!(normalize_date(None), today);
        assert_eq!(normalize_date(Some("  ")), today);
    }

    #[test]
    fn test_normalize_date_always_valid() {
        for token in [Some("03/15/2024"), Some("nonsense"), None] {
            let out = normalize_date(token);
            assert!(NaiveDate::parse_from_str(&out, "%Y-%m-%d").is_ok());
        }
    }

    #[test]
    fn test_field_role_round_trip() {
        for role in [
            FieldRole::Merchant,
            FieldRole::ItemName,
            FieldRole::ItemPrice,
            FieldRole::Subtotal,
            FieldRole::Tax,
            FieldRole::Tip,
            FieldRole::Total,
            FieldRole::Date,
        ] {
            assert_eq!(role.as_str().parse::<FieldRole>().unwrap(), role);
        }
    }
}
