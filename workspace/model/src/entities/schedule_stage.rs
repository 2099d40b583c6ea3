use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::project;

/// The construction phase a stage belongs to.
/// A fixed catalogue of infrastructure work types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
pub enum StageCategory {
    #[sea_orm(string_value = "Earthworks")]
    Earthworks,
    #[sea_orm(string_value = "Drainage")]
    Drainage,
    #[sea_orm(string_value = "WaterNetwork")]
    WaterNetwork,
    #[sea_orm(string_value = "SewerNetwork")]
    SewerNetwork,
    #[sea_orm(string_value = "Paving")]
    Paving,
    #[sea_orm(string_value = "Curbs")]
    Curbs,
    #[sea_orm(string_value = "Signage")]
    Signage,
    #[sea_orm(string_value = "StreetLighting")]
    StreetLighting,
    #[sea_orm(string_value = "Administration")]
    Administration,
}

/// Execution status of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum StageStatus {
    #[sea_orm(string_value = "Planned")]
    Planned,
    #[sea_orm(string_value = "InProgress")]
    InProgress,
    #[sea_orm(string_value = "Done")]
    Done,
}

/// One scheduled stage of a project: a phase of work with a date window,
/// a contracted value and a completion percentage. Edits to the
/// percentage are journaled as progress snapshots.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_stages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The project this stage belongs to.
    pub project_id: i32,
    pub category: StageCategory,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// The contracted value for this stage of work.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub estimated_value: Decimal,
    /// Physical completion, 0 to 100.
    pub percent_complete: i32,
    pub status: StageStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "project::Entity",
        from = "Column::ProjectId",
        to = "project::Column::Id",
        on_delete = "Cascade"
    )]
    Project,
    #[sea_orm(has_many = "super::progress_snapshot::Entity")]
    ProgressSnapshot,
}

impl Related<project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::progress_snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProgressSnapshot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
