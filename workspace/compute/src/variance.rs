//! Physical vs financial completion ("the mismatch chart").
//!
//! Financial progress is money out (paid expenses plus barter) over the
//! contracted value; physical progress is the value-weighted completion
//! of the stages. Money running ahead of the works is the caution case.

use common::{ProgressVariance, VarianceStatus};
use model::entities::{barter_entry, expense, schedule_stage};
use model::entities::expense::ExpenseStatus;
use rust_decimal::Decimal;
use tracing::instrument;

/// Computes the physical and financial completion percentages for a
/// scope and labels the difference. Both percentages are 0 when no
/// value is contracted.
#[instrument(skip(stages, expenses, barters))]
pub fn progress_variance(
    stages: &[schedule_stage::Model],
    expenses: &[expense::Model],
    barters: &[barter_entry::Model],
) -> ProgressVariance {
    let contracted: Decimal = stages.iter().map(|s| s.estimated_value).sum();

    let paid: Decimal = expenses
        .iter()
        .filter(|e| e.status == ExpenseStatus::Paid)
        .map(|e| e.value)
        .sum();
    let bartered: Decimal = barters.iter().map(|b| b.value).sum();

    let executed: Decimal = stages
        .iter()
        .map(|s| s.estimated_value * Decimal::from(s.percent_complete) / Decimal::from(100))
        .sum();

    let hundred = Decimal::from(100);
    let (financial_pct, physical_pct) = if contracted.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (
            ((paid + bartered) / contracted * hundred).round_dp(2),
            (executed / contracted * hundred).round_dp(2),
        )
    };

    let variance = physical_pct - financial_pct;
    let status = if variance >= Decimal::ZERO {
        VarianceStatus::Efficient
    } else {
        VarianceStatus::Caution
    };

    ProgressVariance {
        financial_pct,
        physical_pct,
        variance,
        status,
    }
}
