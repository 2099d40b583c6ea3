//! Domain value checks run at the store boundary, before rows are
//! persisted. The aggregations tolerate out-of-range legacy rows; new
//! writes are rejected here.

use chrono::NaiveDate;

use crate::error::{ComputeError, Result};

/// Rejects completion percentages outside 0..=100.
pub fn percent(value: i32) -> Result<()> {
    if !(0..=100).contains(&value) {
        return Err(ComputeError::PercentOutOfRange(value));
    }
    Ok(())
}

/// Rejects stage windows whose end date precedes the start date.
pub fn stage_window(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(ComputeError::InvertedDateRange { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_bounds() {
        assert!(percent(0).is_ok());
        assert!(percent(100).is_ok());
        assert_eq!(percent(-1), Err(ComputeError::PercentOutOfRange(-1)));
        assert_eq!(percent(101), Err(ComputeError::PercentOutOfRange(101)));
    }

    #[test]
    fn test_stage_window_rejects_inverted_range() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(stage_window(end, start).is_ok());
        assert!(stage_window(start, start).is_ok());
        assert_eq!(
            stage_window(start, end),
            Err(ComputeError::InvertedDateRange { start, end })
        );
    }
}
