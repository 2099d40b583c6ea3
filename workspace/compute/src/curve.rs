//! Cumulative spend curve ("curve S").
//!
//! Budget and actual-spend series are aligned on the union of their
//! months, gaps filled with zero, and both get independent running
//! cumulative totals. The two series are never reconciled against each
//! other: a month with spend but no budget simply shows as overrun.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::{CurvePoint, MonthlyAmount};
use model::entities::{barter_entry, expense};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::calendar::month_of;

/// Buckets expense values by payment month and barter values by trade
/// month into a single actual-spend series, ordered by month. Both are
/// counted as spend regardless of status.
#[instrument(skip(expenses, barters))]
pub fn actual_spend_series(
    expenses: &[expense::Model],
    barters: &[barter_entry::Model],
) -> Vec<MonthlyAmount> {
    let mut by_month: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

    for expense in expenses {
        *by_month.entry(month_of(expense.paid_on)).or_default() += expense.value;
    }
    for barter in barters {
        *by_month.entry(month_of(barter.traded_on)).or_default() += barter.value;
    }

    by_month
        .into_iter()
        .map(|(month, amount)| MonthlyAmount::new(month, amount))
        .collect()
}

/// Aligns a budget series and an actual-spend series onto the union of
/// their months and produces per-month plus running-cumulative values
/// for both. Output length equals the number of distinct months across
/// both inputs; empty inputs produce an empty curve.
#[instrument(skip(budget, actual))]
pub fn build_curve(budget: &[MonthlyAmount], actual: &[MonthlyAmount]) -> Vec<CurvePoint> {
    let mut by_month: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();

    for entry in budget {
        by_month.entry(entry.month).or_default().0 += entry.amount;
    }
    for entry in actual {
        by_month.entry(entry.month).or_default().1 += entry.amount;
    }

    let mut cumulative_budgeted = Decimal::ZERO;
    let mut cumulative_actual = Decimal::ZERO;

    by_month
        .into_iter()
        .map(|(month, (budgeted, actual))| {
            cumulative_budgeted += budgeted;
            cumulative_actual += actual;
            CurvePoint {
                month,
                budgeted,
                actual,
                cumulative_budgeted,
                cumulative_actual,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::entities::expense::{ExpenseCategory, ExpenseStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(y: i32, m: u32, amount: i64) -> MonthlyAmount {
        MonthlyAmount::new(date(y, m, 1), Decimal::from(amount))
    }

    fn expense_row(value: i64, paid_on: NaiveDate) -> expense::Model {
        expense::Model {
            id: 1,
            project_id: 1,
            category: ExpenseCategory::Diesel,
            description: "fuel".to_string(),
            value: Decimal::from(value),
            paid_on,
            status: ExpenseStatus::Paid,
        }
    }

    fn barter_row(value: i64, traded_on: NaiveDate) -> barter_entry::Model {
        barter_entry::Model {
            id: 1,
            project_id: 1,
            description: "lot swap".to_string(),
            value: Decimal::from(value),
            traded_on,
        }
    }

    #[test]
    fn test_curve_covers_union_of_months() {
        let budget = vec![entry(2024, 1, 100), entry(2024, 2, 100)];
        let actual = vec![entry(2024, 2, 80), entry(2024, 4, 50)];

        let curve = build_curve(&budget, &actual);

        assert_eq!(curve.len(), 3);
        assert_eq!(curve[0].month, date(2024, 1, 1));
        assert_eq!(curve[0].actual, Decimal::ZERO);
        assert_eq!(curve[1].budgeted, Decimal::from(100));
        assert_eq!(curve[1].actual, Decimal::from(80));
        // April has spend with no budget: pure overrun, still a row.
        assert_eq!(curve[2].month, date(2024, 4, 1));
        assert_eq!(curve[2].budgeted, Decimal::ZERO);
        assert_eq!(curve[2].cumulative_budgeted, Decimal::from(200));
        assert_eq!(curve[2].cumulative_actual, Decimal::from(130));
    }

    #[test]
    fn test_cumulative_is_monotone_for_nonnegative_input() {
        let budget = vec![entry(2024, 1, 10), entry(2024, 3, 0), entry(2024, 5, 25)];
        let curve = build_curve(&budget, &[]);

        let mut previous = Decimal::ZERO;
        for point in &curve {
            assert!(point.cumulative_budgeted >= previous);
            previous = point.cumulative_budgeted;
        }
    }

    #[test]
    fn test_empty_inputs_produce_empty_curve() {
        assert!(build_curve(&[], &[]).is_empty());
    }

    #[test]
    fn test_actual_series_merges_expenses_and_barters() {
        let expenses = vec![
            expense_row(500, date(2024, 1, 5)),
            expense_row(300, date(2024, 1, 28)),
        ];
        let barters = vec![barter_row(1_000, date(2024, 2, 10))];

        let series = actual_spend_series(&expenses, &barters);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].amount, Decimal::from(800));
        assert_eq!(series[1].amount, Decimal::from(1_000));
    }
}
