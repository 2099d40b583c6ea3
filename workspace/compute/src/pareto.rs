//! Pareto/ABC cost classification.
//!
//! Categories are ranked by value to show which few drive most of the
//! cost. Anything beyond the top five is collapsed into a single
//! "Other" row after sorting, then every row gets its share of the
//! total and the running cumulative share.

use common::ParetoRow;
use model::entities::expense::ExpenseStatus;
use model::entities::{barter_entry, expense};
use rust_decimal::Decimal;
use sea_orm::ActiveEnum;
use tracing::instrument;

/// Synthetic category aggregating all barter values.
pub const BARTER_CATEGORY: &str = "Barter";
/// Collapsed remainder beyond the top five categories.
pub const OTHER_CATEGORY: &str = "Other";

const TOP_CATEGORIES: usize = 5;

/// Totals paid expenses by category, in first-encounter order, and
/// appends one synthetic "Barter" category when any barter value
/// exists. This is the input shape [`classify`] expects.
#[instrument(skip(expenses, barters))]
pub fn paid_expense_totals(
    expenses: &[expense::Model],
    barters: &[barter_entry::Model],
) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();

    for expense in expenses.iter().filter(|e| e.status == ExpenseStatus::Paid) {
        let category = expense.category.to_value();
        match totals.iter_mut().find(|(name, _)| *name == category) {
            Some((_, value)) => *value += expense.value,
            None => totals.push((category, expense.value)),
        }
    }

    let bartered: Decimal = barters.iter().map(|b| b.value).sum();
    if bartered > Decimal::ZERO {
        totals.push((BARTER_CATEGORY.to_string(), bartered));
    }

    totals
}

/// Ranks (category, value) pairs descending by value — ties stay in
/// encounter order — collapses everything beyond the top five into one
/// "Other" row, and computes share plus cumulative share of the total.
/// Empty input yields an empty result.
#[instrument(skip(pairs))]
pub fn classify(pairs: Vec<(String, Decimal)>) -> Vec<ParetoRow> {
    let mut sorted = pairs;
    // Vec::sort_by is stable, which keeps ties in encounter order.
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    if sorted.len() > TOP_CATEGORIES {
        let remainder: Decimal = sorted[TOP_CATEGORIES..].iter().map(|(_, v)| *v).sum();
        sorted.truncate(TOP_CATEGORIES);
        sorted.push((OTHER_CATEGORY.to_string(), remainder));
    }

    let total: Decimal = sorted.iter().map(|(_, v)| *v).sum();
    if total.is_zero() {
        return sorted
            .into_iter()
            .map(|(category, value)| ParetoRow {
                category,
                value,
                share: Decimal::ZERO,
                cumulative_share: Decimal::ZERO,
            })
            .collect();
    }

    let hundred = Decimal::from(100);
    let mut cumulative = Decimal::ZERO;
    sorted
        .into_iter()
        .map(|(category, value)| {
            let share = value / total * hundred;
            cumulative += share;
            ParetoRow {
                category,
                value,
                share,
                cumulative_share: cumulative,
            }
        })
        .collect()
}
