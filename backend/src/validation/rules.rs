//! Validation rules shared across query payloads.

use chrono::NaiveDate;
use validator::ValidationError;

use crate::services::calendar::DateRange;

/// Rejects windows whose start falls after their end.
pub fn validate_window_order(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(ValidationError::new("from_after_to")),
        _ => Ok(()),
    }
}

/// Rejects windows longer than `max_days` inclusive days.
pub fn validate_window_length(range: DateRange, max_days: i64) -> Result<(), ValidationError> {
    if range.len_days() > max_days {
        let mut error = ValidationError::new("range_too_long");
        error.add_param("max_days".into(), &max_days);
        return Err(error);
    }
    Ok(())
}
