//! Pro-rata budget distribution.
//!
//! A contracted value is split evenly across every whole month of its
//! execution window, inclusive of both the start and the end month.
//! The monthly amounts are rounded to cents with the rounding remainder
//! folded into the final month, so the series always sums back to the
//! input value exactly.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::MonthlyAmount;
use model::entities::schedule_stage;
use rust_decimal::Decimal;
use tracing::instrument;

use crate::calendar::{add_months, month_of, months_spanned};

/// Distributes `total` evenly across `months` whole months starting at
/// the month of `start_date`. A requested span of zero is treated as
/// one month carrying the entire value. Zero and negative totals are
/// distributed without error.
#[instrument]
pub fn distribute(total: Decimal, start_date: NaiveDate, months: u32) -> Vec<MonthlyAmount> {
    let months = months.max(1);
    let first = month_of(start_date);
    let per_month = (total / Decimal::from(months)).round_dp(2);

    let mut series: Vec<MonthlyAmount> = (0..months)
        .map(|offset| MonthlyAmount::new(add_months(first, offset), per_month))
        .collect();

    // Fold the rounding remainder into the last month.
    let drift = total - per_month * Decimal::from(months);
    if let Some(last) = series.last_mut() {
        last.amount += drift;
    }

    series
}

/// Distributes `total` across the window from `start_date` through
/// `end_date`, deriving the month count from the window itself.
pub fn distribute_between(
    total: Decimal,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<MonthlyAmount> {
    distribute(total, start_date, months_spanned(start_date, end_date))
}

/// Merges the per-stage distributions of a set of stages into a single
/// monthly budget series, ordered by month.
#[instrument(skip(stages))]
pub fn project_budget(stages: &[schedule_stage::Model]) -> Vec<MonthlyAmount> {
    let mut by_month: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

    for stage in stages {
        for entry in distribute_between(stage.estimated_value, stage.start_date, stage.end_date) {
            *by_month.entry(entry.month).or_default() += entry.amount;
        }
    }

    by_month
        .into_iter()
        .map(|(month, amount)| MonthlyAmount::new(month, amount))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::entities::schedule_stage::{StageCategory, StageStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stage(value: i64, start: NaiveDate, end: NaiveDate) -> schedule_stage::Model {
        schedule_stage::Model {
            id: 1,
            project_id: 1,
            category: StageCategory::Paving,
            start_date: start,
            end_date: end,
            estimated_value: Decimal::new(value * 100, 2),
            percent_complete: 0,
            status: StageStatus::Planned,
        }
    }

    #[test]
    fn test_even_split_over_a_year() {
        let series = distribute(Decimal::from(120_000), date(2024, 1, 1), 12);

        assert_eq!(series.len(), 12);
        assert!(series.iter().all(|e| e.amount == Decimal::from(10_000)));
        assert_eq!(series[0].month, date(2024, 1, 1));
        assert_eq!(series[11].month, date(2024, 12, 1));

        let cumulative_at_six: Decimal = series[..6].iter().map(|e| e.amount).sum();
        assert_eq!(cumulative_at_six, Decimal::from(60_000));
    }

    #[test]
    fn test_sum_is_exact_when_division_rounds() {
        let total = Decimal::from(100);
        let series = distribute(total, date(2024, 1, 1), 3);

        assert_eq!(series.len(), 3);
        let sum: Decimal = series.iter().map(|e| e.amount).sum();
        assert_eq!(sum, total);
        // 100/3 rounds to 33.33; the last month absorbs the remainder.
        assert_eq!(series[0].amount, Decimal::new(33_33, 2));
        assert_eq!(series[2].amount, Decimal::new(33_34, 2));
    }

    #[test]
    fn test_zero_months_collapses_to_one() {
        let series = distribute(Decimal::from(5_000), date(2024, 7, 15), 0);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].month, date(2024, 7, 1));
        assert_eq!(series[0].amount, Decimal::from(5_000));
    }

    #[test]
    fn test_zero_total_yields_zero_entries_over_full_span() {
        let series = distribute(Decimal::ZERO, date(2024, 1, 1), 4);
        assert_eq!(series.len(), 4);
        assert!(series.iter().all(|e| e.amount.is_zero()));
    }

    #[test]
    fn test_distribute_between_derives_span_from_window() {
        let series = distribute_between(Decimal::from(30_000), date(2024, 1, 10), date(2024, 3, 5));
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].amount, Decimal::from(10_000));
    }

    #[test]
    fn test_project_budget_merges_overlapping_stages() {
        let stages = vec![
            stage(20_000, date(2024, 1, 1), date(2024, 2, 28)),
            stage(10_000, date(2024, 2, 1), date(2024, 2, 28)),
        ];

        let series = project_budget(&stages);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].month, date(2024, 1, 1));
        assert_eq!(series[0].amount, Decimal::from(10_000));
        assert_eq!(series[1].month, date(2024, 2, 1));
        assert_eq!(series[1].amount, Decimal::from(20_000));
    }

    #[test]
    fn test_project_budget_empty_input() {
        assert!(project_budget(&[]).is_empty());
    }
}
