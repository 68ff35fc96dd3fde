//! Cost allocation engine
//!
//! Distributes item costs across an assignment graph between items and
//! people, then allocates tax and tip proportionally to each person's share
//! of the subtotal. The engine computes only what is attributable: items
//! nobody was assigned to contribute to no one, so the sum of amounts owed
//! can be less than the receipt total when assignments are incomplete.

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::fields::normalize_date;
use crate::hygiene::finite_or_zero;
use crate::models::{
    ItemAssignment, Person, PersonBreakdown, ReceiptBreakdown, ReceiptItem, SplitRequest,
};

/// How a single assignment was resolved against the item list.
///
/// The lenient skip policy is explicit here so it stays visible and
/// testable instead of hiding inside a loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentOutcome {
    /// Item found; its price was split across the assignees
    Applied { item_id: String, share: f64 },
    /// No item with this id on the receipt; assignment ignored
    SkippedUnknownItem { item_id: String },
    /// Assignment listed no people; nothing to split against
    SkippedEmpty { item_id: String },
}

/// Computes per-person breakdowns from items, people, and assignments
pub struct CostAllocator;

impl CostAllocator {
    pub fn new() -> Self {
        Self
    }

    /// Compute each person's owed amount.
    ///
    /// Returns one `PersonBreakdown` per input person, in input order;
    /// people with no assigned items owe 0.
    pub fn calculate(
        &self,
        items: &[ReceiptItem],
        people: &[Person],
        assignments: &[ItemAssignment],
        subtotal: f64,
        tax: f64,
        tip: Option<f64>,
    ) -> Vec<PersonBreakdown> {
        let item_totals = self.accumulate_item_totals(items, people, assignments);

        people
            .iter()
            .map(|person| {
                let items_total = item_totals.get(&person.id).copied().unwrap_or(0.0);
                let proportion = if subtotal > 0.0 {
                    items_total / subtotal
                } else {
                    0.0
                };

                let person_tax = tax * proportion;
                let person_tip = tip.unwrap_or(0.0) * proportion;

                PersonBreakdown {
                    person_id: person.id.clone(),
                    person_name: person.name.clone(),
                    amount_owed: finite_or_zero(items_total + person_tax + person_tip),
                }
            })
            .collect()
    }

    /// Fold the assignment list into per-person item totals (even split).
    fn accumulate_item_totals(
        &self,
        items: &[ReceiptItem],
        people: &[Person],
        assignments: &[ItemAssignment],
    ) -> HashMap<String, f64> {
        let mut totals: HashMap<String, f64> =
            people.iter().map(|p| (p.id.clone(), 0.0)).collect();

        for assignment in assignments {
            match self.resolve(items, assignment) {
                AssignmentOutcome::Applied { share, .. } => {
                    for person_id in &assignment.person_ids {
                        *totals.entry(person_id.clone()).or_insert(0.0) += share;
                    }
                }
                outcome => debug!(?outcome, "skipping assignment"),
            }
        }

        totals
    }

    /// Resolve one assignment against the item list.
    fn resolve(&self, items: &[ReceiptItem], assignment: &ItemAssignment) -> AssignmentOutcome {
        let Some(item) = items.iter().find(|i| i.id == assignment.item_id) else {
            return AssignmentOutcome::SkippedUnknownItem {
                item_id: assignment.item_id.clone(),
            };
        };

        if assignment.person_ids.is_empty() {
            return AssignmentOutcome::SkippedEmpty {
                item_id: assignment.item_id.clone(),
            };
        }

        AssignmentOutcome::Applied {
            item_id: item.id.clone(),
            share: item.price / assignment.person_ids.len() as f64,
        }
    }

    /// Build the persistable breakdown record for one allocation run.
    ///
    /// Computes `user_paid` as the sum of all owed amounts, stamps id and
    /// creation time, and defaults a missing receipt date to today.
    pub fn build_breakdown(&self, user_id: &str, request: &SplitRequest) -> ReceiptBreakdown {
        let people_breakdown = self.calculate(
            &request.items,
            &request.people,
            &request.assignments,
            request.receipt.subtotal,
            request.receipt.tax,
            request.receipt.tip,
        );

        let user_paid = finite_or_zero(people_breakdown.iter().map(|p| p.amount_owed).sum());

        ReceiptBreakdown {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            merchant_name: request.receipt.merchant_name.clone(),
            date: normalize_date(request.receipt.date.as_deref()),
            subtotal: request.receipt.subtotal,
            tax: request.receipt.tax,
            tip: request.receipt.tip,
            total: request.receipt.total,
            user_paid,
            people_breakdown,
            created_at: Utc::now(),
        }
    }
}

impl Default for CostAllocator {
    fn default() -> Self {
        Self::new()
    }
}
