//! Chart-ready row types produced by the aggregation core.
//!
//! Every type here is a flat record with named numeric/date/string
//! fields, ordered by the producer. Months are represented as the first
//! day of the month.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One month of a monthly money series (budget or spend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyAmount {
    /// First day of the month.
    pub month: NaiveDate,
    pub amount: Decimal,
}

impl MonthlyAmount {
    pub fn new(month: NaiveDate, amount: Decimal) -> Self {
        Self { month, amount }
    }
}

/// One row of the curve-S table: budget vs actual spend for a month,
/// with running cumulative totals for both series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurvePoint {
    /// First day of the month.
    pub month: NaiveDate,
    pub budgeted: Decimal,
    pub actual: Decimal,
    pub cumulative_budgeted: Decimal,
    pub cumulative_actual: Decimal,
}

/// A schedule stage past its deadline and below 100% completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AtRiskStage {
    pub stage_id: i32,
    pub project_id: i32,
    pub project_name: String,
    /// Stage category label as stored.
    pub category: String,
    pub end_date: NaiveDate,
    pub estimated_value: Decimal,
    pub percent_complete: i32,
    /// `estimated_value * (1 - percent/100)` — the value still exposed.
    pub pending_value: Decimal,
}

/// Display label for the physical-vs-financial comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum VarianceStatus {
    /// Physical progress at or ahead of financial progress.
    Efficient,
    /// Financial progress outpacing physical progress.
    Caution,
}

/// Physical vs financial completion for a scope (one project or all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProgressVariance {
    /// (paid expenses + barter) / contracted value, as a percentage.
    pub financial_pct: Decimal,
    /// Value-weighted physical completion, as a percentage.
    pub physical_pct: Decimal,
    /// physical - financial; negative means money is running ahead.
    pub variance: Decimal,
    pub status: VarianceStatus,
}

/// One row of a Pareto/ABC cost breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParetoRow {
    pub category: String,
    pub value: Decimal,
    /// Share of the total, as a percentage.
    pub share: Decimal,
    /// Running sum of shares in sorted order; 100 on the last row.
    pub cumulative_share: Decimal,
}

/// Mean completion percentage reported for a project on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyProgressPoint {
    pub date: NaiveDate,
    pub project_id: i32,
    pub project_name: String,
    pub mean_percent: Decimal,
}

/// Per-project financial summary row for the dashboard table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectSummaryRow {
    pub project_id: i32,
    pub name: String,
    pub company: String,
    /// Sum of the project's stage estimates.
    pub contract_value: Decimal,
    pub paid: Decimal,
    pub bartered: Decimal,
    /// contract - paid - bartered.
    pub balance: Decimal,
    /// (paid + bartered) / contract, capped at 100.
    pub percent_paid: Decimal,
}

/// Portfolio (or single-project) headline numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PortfolioKpis {
    pub contract_total: Decimal,
    pub paid_total: Decimal,
    pub barter_total: Decimal,
    /// contract_total - paid_total - barter_total.
    pub balance: Decimal,
    /// Pending value of stages past their deadline.
    pub risk_exposure: Decimal,
    pub variance: ProgressVariance,
}

/// Projected future outflow for one project in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectionPoint {
    /// First day of the month.
    pub month: NaiveDate,
    pub project_id: i32,
    pub project_name: String,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_amount_serializes_decimal_as_string() {
        let point = MonthlyAmount::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Decimal::new(10_000_00, 2),
        );
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["month"], "2024-01-01");
        assert_eq!(json["amount"], "10000.00");
    }

    #[test]
    fn test_variance_status_roundtrip() {
        let json = serde_json::to_string(&VarianceStatus::Caution).unwrap();
        let back: VarianceStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VarianceStatus::Caution);
    }
}
