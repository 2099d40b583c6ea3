use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::schedule_stage;

/// An append-only record of a stage's completion percentage at a point
/// in time. Written whenever a stage's percentage is set; never updated,
/// removed only by cascade when the stage is deleted. The rows
/// reconstruct the physical progress time series.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "progress_snapshots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The stage whose progress was recorded.
    pub stage_id: i32,
    pub recorded_on: NaiveDate,
    /// The percentage reported on that date, 0 to 100.
    pub percent: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "schedule_stage::Entity",
        from = "Column::StageId",
        to = "schedule_stage::Column::Id",
        on_delete = "Cascade"
    )]
    ScheduleStage,
}

impl Related<schedule_stage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleStage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
