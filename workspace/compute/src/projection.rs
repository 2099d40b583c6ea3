//! Future cash-flow projection.
//!
//! For every stage still open, the value not yet executed is spread
//! evenly over the months left in its window, starting no earlier than
//! today. The result is the expected monthly outflow per project.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use common::ProjectionPoint;
use model::entities::{project, schedule_stage};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::budget::distribute;
use crate::calendar::{month_of, months_spanned};
use crate::risk::pending_value;

/// Projects the remaining value of open stages onto future months,
/// grouped by (month, project) and ordered the same way. A stage whose
/// window has already closed books its whole remainder on the current
/// month. Stages that are done, at 100%, or with nothing remaining are
/// skipped.
#[instrument(skip(stages, projects))]
pub fn future_outflow(
    stages: &[schedule_stage::Model],
    projects: &[project::Model],
    today: NaiveDate,
) -> Vec<ProjectionPoint> {
    let names: HashMap<i32, &str> = projects
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();

    let mut by_month: BTreeMap<(NaiveDate, i32), Decimal> = BTreeMap::new();

    for stage in stages {
        if stage.status == schedule_stage::StageStatus::Done || stage.percent_complete >= 100 {
            continue;
        }
        let remaining = pending_value(stage);
        if remaining <= Decimal::ZERO {
            continue;
        }

        let window_start = today.max(stage.start_date);
        let series = if stage.end_date <= window_start {
            // Window already closed: everything lands on the current month.
            distribute(remaining, today, 1)
        } else {
            distribute(
                remaining,
                window_start,
                months_spanned(month_of(window_start), stage.end_date),
            )
        };

        for entry in series {
            *by_month.entry((entry.month, stage.project_id)).or_default() += entry.amount;
        }
    }

    by_month
        .into_iter()
        .map(|((month, project_id), amount)| ProjectionPoint {
            month,
            project_id,
            project_name: names
                .get(&project_id)
                .map(|name| name.to_string())
                .unwrap_or_default(),
            amount,
        })
        .collect()
}
