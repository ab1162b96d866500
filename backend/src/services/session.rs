//! Reduces one employee's punch events for one day into worked time and session bounds.

use chrono::NaiveDateTime;

use crate::models::punch_event::PunchEvent;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionAggregate {
    /// Sum of completed cycles, overnight-corrected.
    pub total_minutes: i64,
    pub first_punch_in: Option<NaiveDateTime>,
    /// Punch-out of the most recent cycle that has one; an open trailing cycle is skipped.
    pub last_completed_punch_out: Option<NaiveDateTime>,
    pub has_any_punch: bool,
}

/// Folds a day's events, in any order, into a [`SessionAggregate`].
pub fn aggregate<'a, I>(events: I) -> SessionAggregate
where
    I: IntoIterator<Item = &'a PunchEvent>,
{
    let mut sorted: Vec<&PunchEvent> = events.into_iter().collect();
    sorted.sort_by_key(|event| event.punch_in);

    let total_minutes = sorted
        .iter()
        .filter_map(|event| event.completed_minutes())
        .sum();

    SessionAggregate {
        total_minutes,
        first_punch_in: sorted.first().map(|event| event.punch_in),
        last_completed_punch_out: sorted.iter().rev().find_map(|event| event.punch_out),
        has_any_punch: !sorted.is_empty(),
    }
}
