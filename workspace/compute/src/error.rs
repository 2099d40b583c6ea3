use thiserror::Error;

/// Error types for the compute module.
///
/// The aggregations themselves never fail — empty input yields empty
/// output and divisions are zero-guarded — so these variants describe
/// invalid domain values, produced by the checks in [`crate::validate`]
/// that the store boundary runs before persisting rows.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ComputeError {
    /// A completion percentage outside the 0..=100 range.
    #[error("percentage out of range: {0} (expected 0..=100)")]
    PercentOutOfRange(i32),

    /// A stage window whose end date precedes its start date.
    #[error("end date {end} precedes start date {start}")]
    InvertedDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
