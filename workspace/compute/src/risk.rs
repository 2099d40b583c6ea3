//! Delay and risk exposure.
//!
//! A stage is at risk when its deadline has passed and it is not
//! complete. The exposure is the value still pending on those stages.
//! Everything is recomputed fresh per query against an explicit
//! `today`; there is no alerting state.

use std::collections::HashMap;

use chrono::NaiveDate;
use common::AtRiskStage;
use model::entities::{project, schedule_stage};
use rust_decimal::Decimal;
use sea_orm::ActiveEnum;
use tracing::instrument;

/// The value still outstanding on a stage:
/// `estimated_value * (1 - percent/100)`.
pub fn pending_value(stage: &schedule_stage::Model) -> Decimal {
    stage.estimated_value * (Decimal::ONE - Decimal::from(stage.percent_complete) / Decimal::from(100))
}

fn is_at_risk(stage: &schedule_stage::Model, today: NaiveDate) -> bool {
    stage.end_date < today && stage.percent_complete < 100
}

/// Lists the stages past their deadline and below 100%, with the
/// pending value of each, ordered by deadline ascending.
#[instrument(skip(stages, projects))]
pub fn at_risk_stages(
    stages: &[schedule_stage::Model],
    projects: &[project::Model],
    today: NaiveDate,
) -> Vec<AtRiskStage> {
    let names: HashMap<i32, &str> = projects
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();

    let mut rows: Vec<AtRiskStage> = stages
        .iter()
        .filter(|stage| is_at_risk(stage, today))
        .map(|stage| AtRiskStage {
            stage_id: stage.id,
            project_id: stage.project_id,
            project_name: names
                .get(&stage.project_id)
                .map(|name| name.to_string())
                .unwrap_or_default(),
            category: stage.category.to_value(),
            end_date: stage.end_date,
            estimated_value: stage.estimated_value,
            percent_complete: stage.percent_complete,
            pending_value: pending_value(stage),
        })
        .collect();

    rows.sort_by_key(|row| row.end_date);
    rows
}

/// Total pending value across all at-risk stages.
#[instrument(skip(stages))]
pub fn risk_exposure(stages: &[schedule_stage::Model], today: NaiveDate) -> Decimal {
    stages
        .iter()
        .filter(|stage| is_at_risk(stage, today))
        .map(pending_value)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::entities::schedule_stage::{StageCategory, StageStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stage(id: i32, value: i64, percent: i32, end: NaiveDate) -> schedule_stage::Model {
        schedule_stage::Model {
            id,
            project_id: 1,
            category: StageCategory::Drainage,
            start_date: date(2024, 1, 1),
            end_date: end,
            estimated_value: Decimal::from(value),
            percent_complete: percent,
            status: StageStatus::InProgress,
        }
    }

    fn projects() -> Vec<project::Model> {
        vec![project::Model {
            id: 1,
            name: "Green Hills".to_string(),
            company: "Own".to_string(),
        }]
    }

    #[test]
    fn test_overdue_incomplete_stage_is_at_risk() {
        let today = date(2024, 6, 15);
        // 50000 at 40%, deadline yesterday: 30000 still pending.
        let stages = vec![stage(1, 50_000, 40, date(2024, 6, 14))];

        let rows = at_risk_stages(&stages, &projects(), today);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pending_value, Decimal::from(30_000));
        assert_eq!(rows[0].project_name, "Green Hills");

        assert_eq!(risk_exposure(&stages, today), Decimal::from(30_000));
    }

    #[test]
    fn test_completed_stage_is_never_at_risk() {
        let today = date(2024, 6, 15);
        let stages = vec![stage(1, 50_000, 100, date(2024, 1, 1))];

        assert!(at_risk_stages(&stages, &projects(), today).is_empty());
        assert_eq!(risk_exposure(&stages, today), Decimal::ZERO);
    }

    #[test]
    fn test_future_deadline_is_never_at_risk() {
        let today = date(2024, 6, 15);
        let stages = vec![stage(1, 50_000, 0, date(2024, 6, 16))];

        assert!(at_risk_stages(&stages, &projects(), today).is_empty());
    }

    #[test]
    fn test_deadline_today_is_not_yet_at_risk() {
        // Strictly-before comparison: the deadline day itself is safe.
        let today = date(2024, 6, 15);
        let stages = vec![stage(1, 50_000, 0, today)];

        assert!(at_risk_stages(&stages, &projects(), today).is_empty());
    }

    #[test]
    fn test_rows_sorted_by_deadline() {
        let today = date(2024, 6, 15);
        let stages = vec![
            stage(1, 1_000, 0, date(2024, 5, 1)),
            stage(2, 1_000, 0, date(2024, 2, 1)),
        ];

        let rows = at_risk_stages(&stages, &projects(), today);
        assert_eq!(rows[0].stage_id, 2);
        assert_eq!(rows[1].stage_id, 1);
    }
}
