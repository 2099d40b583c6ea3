//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the construction management application
//! here: projects, their scheduled stages with progress history, the
//! financial movements (expenses and barter entries) and the customer
//! intake submissions captured by the sales form.

pub mod barter_entry;
pub mod expense;
pub mod intake_submission;
pub mod progress_snapshot;
pub mod project;
pub mod schedule_stage;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::barter_entry::Entity as BarterEntry;
    pub use super::expense::Entity as Expense;
    pub use super::intake_submission::Entity as IntakeSubmission;
    pub use super::progress_snapshot::Entity as ProgressSnapshot;
    pub use super::project::Entity as Project;
    pub use super::schedule_stage::Entity as ScheduleStage;
}
