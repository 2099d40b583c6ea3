pub mod analytics;
pub mod barters;
pub mod expenses;
pub mod health;
pub mod intake;
pub mod projects;
pub mod stages;
