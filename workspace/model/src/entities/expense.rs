use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::project;

/// Cost category of an expense. Fixed catalogue used by the Pareto
/// breakdowns; free-form detail goes in the description field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ExpenseCategory {
    #[sea_orm(string_value = "Materials")]
    Materials,
    #[sea_orm(string_value = "Diesel")]
    Diesel,
    #[sea_orm(string_value = "Priming")]
    Priming,
    #[sea_orm(string_value = "Emulsion")]
    Emulsion,
    #[sea_orm(string_value = "CrushedStone")]
    CrushedStone,
    #[sea_orm(string_value = "Freight")]
    Freight,
    #[sea_orm(string_value = "Electrical")]
    Electrical,
    #[sea_orm(string_value = "Labor")]
    Labor,
    #[sea_orm(string_value = "Equipment")]
    Equipment,
    #[sea_orm(string_value = "Other")]
    Other,
}

/// Payment status of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum ExpenseStatus {
    #[sea_orm(string_value = "Paid")]
    Paid,
    #[sea_orm(string_value = "Pending")]
    Pending,
}

/// A single cash outflow booked against a project. No edit history is
/// kept; rows are created, edited and deleted freely.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The project this expense was booked against.
    pub project_id: i32,
    pub category: ExpenseCategory,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub value: Decimal,
    /// Payment (or due) date.
    pub paid_on: NaiveDate,
    pub status: ExpenseStatus,
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
}

impl Related<project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
