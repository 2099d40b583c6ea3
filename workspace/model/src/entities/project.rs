use sea_orm::entity::prelude::*;

/// A construction project (a development or job site).
/// Every other domain entity hangs off a project via foreign key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// The company executing the project ("Own" for in-house work).
    pub company: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::schedule_stage::Entity")]
    ScheduleStage,
    #[sea_orm(has_many = "super::expense::Entity")]
    Expense,
    #[sea_orm(has_many = "super::barter_entry::Entity")]
    BarterEntry,
}

impl Related<super::schedule_stage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleStage.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl Related<super::barter_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BarterEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
