//! Inclusive date-range arithmetic plus holiday/weekend day counting.

use std::collections::BTreeSet;

use chrono::{Datelike, Months, NaiveDate, Weekday};
use thiserror::Error;

use crate::models::holiday::Holiday;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("invalid year/month: {year}/{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// A date interval where both endpoints are members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CalendarError> {
        if start > end {
            return Err(CalendarError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// First through last day of the given month.
    pub fn month(year: i32, month: u32) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidMonth { year, month };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of member days (`end - start + 1`).
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Intersection with the inclusive interval `from..=to`, if any.
    pub fn clip(&self, from: NaiveDate, to: NaiveDate) -> Option<DateRange> {
        let start = self.start.max(from);
        let end = self.end.min(to);
        (start <= end).then_some(DateRange { start, end })
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// Statistics window for a month: up to `today` for the current month, otherwise the full month.
pub fn month_window(year: i32, month: u32, today: NaiveDate) -> Result<DateRange, CalendarError> {
    let full = DateRange::month(year, month)?;
    if today.year() == year && today.month() == month {
        Ok(DateRange {
            start: full.start,
            end: full.end.min(today),
        })
    } else {
        Ok(full)
    }
}

pub fn is_holiday(date: NaiveDate, holidays: &[Holiday]) -> bool {
    holidays.iter().any(|holiday| holiday.covers(date))
}

/// Every date inside `range` covered by at least one holiday.
pub fn holiday_dates(holidays: &[Holiday], range: DateRange) -> BTreeSet<NaiveDate> {
    holidays
        .iter()
        .filter_map(|holiday| range.clip(holiday.from_date, holiday.to_date))
        .flat_map(|clipped| clipped.days())
        .collect()
}

/// Holiday days inside `range`. Each holiday is clipped to the range; a date covered by two
/// overlapping holidays counts once.
pub fn count_holiday_days(holidays: &[Holiday], range: DateRange) -> i64 {
    holiday_dates(holidays, range).len() as i64
}

/// Weekend days inside `range` that are not already holiday days.
pub fn count_weekend_days(range: DateRange, weekend: &[Weekday], holidays: &[Holiday]) -> i64 {
    let covered = holiday_dates(holidays, range);
    range
        .days()
        .filter(|day| weekend.contains(&day.weekday()) && !covered.contains(day))
        .count() as i64
}

/// Days that are neither weekend nor holiday, floored at zero.
pub fn working_days(range: DateRange, weekend: &[Weekday], holidays: &[Holiday]) -> i64 {
    let total = range.len_days();
    let holiday_days = count_holiday_days(holidays, range);
    let weekend_days = count_weekend_days(range, weekend, holidays);
    (total - holiday_days - weekend_days).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn range(a: NaiveDate, b: NaiveDate) -> DateRange {
        DateRange::new(a, b).unwrap()
    }

    #[test]
    fn new_rejects_reversed_range() {
        let err = DateRange::new(d(2024, 6, 2), d(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidRange { .. }));
    }

    #[test]
    fn len_days_is_inclusive() {
        assert_eq!(range(d(2024, 6, 1), d(2024, 6, 1)).len_days(), 1);
        assert_eq!(range(d(2024, 6, 1), d(2024, 6, 30)).len_days(), 30);
        assert_eq!(range(d(2024, 6, 1), d(2024, 6, 30)).days().count(), 30);
    }

    #[test]
    fn month_handles_leap_february_and_december() {
        let feb = DateRange::month(2024, 2).unwrap();
        assert_eq!(feb.end(), d(2024, 2, 29));
        let dec = DateRange::month(2024, 12).unwrap();
        assert_eq!(dec.start(), d(2024, 12, 1));
        assert_eq!(dec.end(), d(2024, 12, 31));
        assert!(DateRange::month(2024, 13).is_err());
    }

    #[test]
    fn month_window_clips_current_month_to_today() {
        let window = month_window(2024, 6, d(2024, 6, 12)).unwrap();
        assert_eq!(window.start(), d(2024, 6, 1));
        assert_eq!(window.end(), d(2024, 6, 12));

        let past = month_window(2024, 5, d(2024, 6, 12)).unwrap();
        assert_eq!(past.end(), d(2024, 5, 31));
    }

    #[test]
    fn holiday_days_are_clipped_to_range() {
        let holidays = vec![
            Holiday::new("Spanning", d(2024, 5, 29), d(2024, 6, 2)),
            Holiday::new("Outside", d(2024, 7, 1), d(2024, 7, 3)),
        ];
        let june = DateRange::month(2024, 6).unwrap();
        assert_eq!(count_holiday_days(&holidays, june), 2);
    }

    #[test]
    fn overlapping_holidays_count_each_date_once() {
        let holidays = vec![
            Holiday::new("A", d(2024, 6, 10), d(2024, 6, 12)),
            Holiday::new("B", d(2024, 6, 12), d(2024, 6, 13)),
        ];
        let june = DateRange::month(2024, 6).unwrap();
        assert_eq!(count_holiday_days(&holidays, june), 4);
    }

    #[test]
    fn weekend_inside_holiday_is_not_double_counted() {
        // 2024-06-08 (Sat) and 2024-06-09 (Sun) sit inside the holiday.
        let holidays = vec![Holiday::new("Festival", d(2024, 6, 7), d(2024, 6, 10))];
        let r = range(d(2024, 6, 3), d(2024, 6, 16));
        assert_eq!(count_holiday_days(&holidays, r), 4);
        assert_eq!(count_weekend_days(r, &WEEKEND, &holidays), 2);
        assert_eq!(working_days(r, &WEEKEND, &holidays), 14 - 4 - 2);
    }

    #[test]
    fn working_days_for_plain_month() {
        // June 2024 has 10 weekend days.
        let june = DateRange::month(2024, 6).unwrap();
        assert_eq!(working_days(june, &WEEKEND, &[]), 20);
    }

    #[test]
    fn working_days_never_negative() {
        let r = range(d(2024, 6, 8), d(2024, 6, 9));
        let holidays = vec![Holiday::new("Weekend holiday", d(2024, 6, 8), d(2024, 6, 9))];
        assert_eq!(working_days(r, &WEEKEND, &holidays), 0);
    }

    #[test]
    fn is_holiday_checks_every_range() {
        let holidays = vec![Holiday::new("One", d(2024, 1, 1), d(2024, 1, 1))];
        assert!(is_holiday(d(2024, 1, 1), &holidays));
        assert!(!is_holiday(d(2024, 1, 2), &holidays));
    }
}
