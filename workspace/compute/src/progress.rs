//! Physical progress time series from the snapshot journal.
//!
//! Snapshots are joined to their project through the stage and reduced
//! to the mean percentage reported per (day, project). This is a known
//! approximation of whole-project progress: the mean is unweighted and
//! stages not touched that day are not carried forward.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use common::DailyProgressPoint;
use model::entities::{progress_snapshot, project, schedule_stage};
use rust_decimal::Decimal;
use tracing::instrument;

/// Reduces raw snapshots to one point per (day, project): the mean of
/// the percentages reported for that project that day. Snapshots whose
/// stage is unknown are skipped. Output is ordered by date, then
/// project id.
#[instrument(skip(snapshots, stages, projects))]
pub fn daily_progress(
    snapshots: &[progress_snapshot::Model],
    stages: &[schedule_stage::Model],
    projects: &[project::Model],
) -> Vec<DailyProgressPoint> {
    let stage_project: HashMap<i32, i32> =
        stages.iter().map(|s| (s.id, s.project_id)).collect();
    let names: HashMap<i32, &str> = projects
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();

    let mut grouped: BTreeMap<(NaiveDate, i32), Vec<i32>> = BTreeMap::new();
    for snapshot in snapshots {
        let Some(&project_id) = stage_project.get(&snapshot.stage_id) else {
            continue;
        };
        grouped
            .entry((snapshot.recorded_on, project_id))
            .or_default()
            .push(snapshot.percent);
    }

    grouped
        .into_iter()
        .map(|((date, project_id), percents)| {
            let sum: Decimal = percents.iter().map(|p| Decimal::from(*p)).sum();
            let mean = (sum / Decimal::from(percents.len() as i64)).round_dp(2);
            DailyProgressPoint {
                date,
                project_id,
                project_name: names
                    .get(&project_id)
                    .map(|name| name.to_string())
                    .unwrap_or_default(),
                mean_percent: mean,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::entities::schedule_stage::{StageCategory, StageStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot(id: i32, stage_id: i32, day: NaiveDate, percent: i32) -> progress_snapshot::Model {
        progress_snapshot::Model {
            id,
            stage_id,
            recorded_on: day,
            percent,
        }
    }

    fn stage(id: i32, project_id: i32) -> schedule_stage::Model {
        schedule_stage::Model {
            id,
            project_id,
            category: StageCategory::Earthworks,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 12, 31),
            estimated_value: Decimal::from(1_000),
            percent_complete: 0,
            status: StageStatus::InProgress,
        }
    }

    fn project(id: i32, name: &str) -> project::Model {
        project::Model {
            id,
            name: name.to_string(),
            company: "Own".to_string(),
        }
    }

    #[test]
    fn test_same_day_snapshots_average_per_project() {
        let stages = vec![stage(1, 10), stage(2, 10)];
        let projects = vec![project(10, "Green Hills")];
        let day = date(2024, 4, 1);
        let snapshots = vec![snapshot(1, 1, day, 40), snapshot(2, 2, day, 60)];

        let points = daily_progress(&snapshots, &stages, &projects);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].mean_percent, Decimal::from(50));
        assert_eq!(points[0].project_name, "Green Hills");
    }

    #[test]
    fn test_projects_stay_separate_and_ordered_by_date() {
        let stages = vec![stage(1, 10), stage(2, 20)];
        let projects = vec![project(10, "A"), project(20, "B")];
        let snapshots = vec![
            snapshot(1, 2, date(2024, 5, 1), 30),
            snapshot(2, 1, date(2024, 4, 1), 10),
        ];

        let points = daily_progress(&snapshots, &stages, &projects);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, date(2024, 4, 1));
        assert_eq!(points[0].project_id, 10);
        assert_eq!(points[1].project_id, 20);
    }

    #[test]
    fn test_orphan_snapshots_are_skipped() {
        let points = daily_progress(
            &[snapshot(1, 999, date(2024, 1, 1), 50)],
            &[],
            &[],
        );
        assert!(points.is_empty());
    }
}
