//! Pure aggregation core for the construction management backend.
//!
//! Every function here is a data transformation over already-loaded
//! entity rows: handlers fetch the rows, the functions here group,
//! join and reduce them into the chart-ready record types from
//! `common`. Nothing in this crate touches the database, reads the
//! clock, or caches between calls — dates like "today" are always
//! explicit parameters.

pub mod budget;
pub mod calendar;
pub mod curve;
pub mod error;
pub mod pareto;
pub mod progress;
pub mod projection;
pub mod risk;
pub mod summary;
pub mod validate;
pub mod variance;

pub use error::{ComputeError, Result};
