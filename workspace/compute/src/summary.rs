//! Financial summaries: the dashboard headline numbers and the
//! per-project status table.

use std::collections::HashMap;

use chrono::NaiveDate;
use common::{PortfolioKpis, ProjectSummaryRow};
use model::entities::{barter_entry, expense, project, schedule_stage};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::risk::risk_exposure;
use crate::variance::progress_variance;

/// One row per project: contracted value, money out, barter credit,
/// outstanding balance and percentage settled. Projects with no
/// financial activity at all are omitted. Booked expenses count toward
/// "paid" regardless of status, matching the ledger view; the variance
/// calculation is the one place that insists on settled expenses only.
#[instrument(skip(projects, stages, expenses, barters))]
pub fn project_summaries(
    projects: &[project::Model],
    stages: &[schedule_stage::Model],
    expenses: &[expense::Model],
    barters: &[barter_entry::Model],
) -> Vec<ProjectSummaryRow> {
    let mut contract: HashMap<i32, Decimal> = HashMap::new();
    for stage in stages {
        *contract.entry(stage.project_id).or_default() += stage.estimated_value;
    }

    let mut paid: HashMap<i32, Decimal> = HashMap::new();
    for expense in expenses {
        *paid.entry(expense.project_id).or_default() += expense.value;
    }

    let mut bartered: HashMap<i32, Decimal> = HashMap::new();
    for barter in barters {
        *bartered.entry(barter.project_id).or_default() += barter.value;
    }

    let hundred = Decimal::from(100);
    projects
        .iter()
        .filter_map(|project| {
            let contract_value = contract.get(&project.id).copied().unwrap_or_default();
            let paid_value = paid.get(&project.id).copied().unwrap_or_default();
            let barter_value = bartered.get(&project.id).copied().unwrap_or_default();

            if contract_value.is_zero() && paid_value.is_zero() && barter_value.is_zero() {
                return None;
            }

            let percent_paid = if contract_value.is_zero() {
                Decimal::ZERO
            } else {
                ((paid_value + barter_value) / contract_value * hundred)
                    .round_dp(2)
                    .min(hundred)
            };

            Some(ProjectSummaryRow {
                project_id: project.id,
                name: project.name.clone(),
                company: project.company.clone(),
                contract_value,
                paid: paid_value,
                bartered: barter_value,
                balance: contract_value - paid_value - barter_value,
                percent_paid,
            })
        })
        .collect()
}

/// Headline numbers for a scope (one project or the whole portfolio):
/// totals, outstanding balance, overdue exposure and the
/// physical-vs-financial comparison.
#[instrument(skip(stages, expenses, barters))]
pub fn portfolio_kpis(
    stages: &[schedule_stage::Model],
    expenses: &[expense::Model],
    barters: &[barter_entry::Model],
    today: NaiveDate,
) -> PortfolioKpis {
    let contract_total: Decimal = stages.iter().map(|s| s.estimated_value).sum();
    let paid_total: Decimal = expenses.iter().map(|e| e.value).sum();
    let barter_total: Decimal = barters.iter().map(|b| b.value).sum();

    PortfolioKpis {
        contract_total,
        paid_total,
        barter_total,
        balance: contract_total - paid_total - barter_total,
        risk_exposure: risk_exposure(stages, today),
        variance: progress_variance(stages, expenses, barters),
    }
}
