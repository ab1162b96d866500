//! Attendance policy: weekend days, office hours, grace periods and sheet symbols.
//!
//! The policy is stored as a single nullable row. Every unset column falls back to its
//! documented default, so a missing or partial configuration never fails a computation.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const DEFAULT_WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];
pub const DEFAULT_GRACE_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusSymbols {
    pub present: String,
    pub absent: String,
    pub holiday: String,
    /// Used for leave whose type has no configured symbol.
    pub default_leave: String,
}

impl Default for StatusSymbols {
    fn default() -> Self {
        Self {
            present: "P".into(),
            absent: "A".into(),
            holiday: "H".into(),
            default_leave: "/".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendancePolicy {
    #[schema(value_type = Vec<String>)]
    pub weekend_days: Vec<Weekday>,
    pub office_start: NaiveTime,
    pub office_end: NaiveTime,
    pub late_mark_grace_minutes: i64,
    pub overtime_grace_minutes: i64,
    pub symbols: StatusSymbols,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            weekend_days: DEFAULT_WEEKEND.to_vec(),
            office_start: hm(9, 0),
            office_end: hm(17, 0),
            late_mark_grace_minutes: DEFAULT_GRACE_MINUTES,
            overtime_grace_minutes: DEFAULT_GRACE_MINUTES,
            symbols: StatusSymbols::default(),
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

impl AttendancePolicy {
    /// Merges a stored row over the defaults, field by field.
    pub fn from_stored(row: Option<PolicyRow>) -> Self {
        let defaults = Self::default();
        let Some(row) = row else {
            tracing::debug!("no attendance policy configured, using defaults");
            return defaults;
        };

        let weekend_days = row
            .weekend_days
            .as_deref()
            .map(parse_weekdays)
            .filter(|days| !days.is_empty())
            .unwrap_or(defaults.weekend_days);

        let symbol = |value: Option<String>, fallback: String| {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(fallback)
        };

        Self {
            weekend_days,
            office_start: row.office_start.unwrap_or(defaults.office_start),
            office_end: row.office_end.unwrap_or(defaults.office_end),
            late_mark_grace_minutes: row
                .late_mark_grace_minutes
                .map(i64::from)
                .filter(|m| *m >= 0)
                .unwrap_or(defaults.late_mark_grace_minutes),
            overtime_grace_minutes: row
                .overtime_grace_minutes
                .map(i64::from)
                .filter(|m| *m >= 0)
                .unwrap_or(defaults.overtime_grace_minutes),
            symbols: StatusSymbols {
                present: symbol(row.present_symbol, defaults.symbols.present),
                absent: symbol(row.absent_symbol, defaults.symbols.absent),
                holiday: symbol(row.holiday_symbol, defaults.symbols.holiday),
                default_leave: symbol(row.default_leave_symbol, defaults.symbols.default_leave),
            },
        }
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend_days.contains(&date.weekday())
    }

    /// Seconds after midnight past which a first punch-in counts as late.
    pub fn late_cutoff_seconds(&self) -> i64 {
        seconds_of_day(self.office_start) + self.late_mark_grace_minutes * 60
    }

    /// Seconds after midnight past which a final punch-out earns overtime.
    pub fn overtime_cutoff_seconds(&self) -> i64 {
        seconds_of_day(self.office_end) + self.overtime_grace_minutes * 60
    }
}

pub fn seconds_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight())
}

/// Parses a comma separated list of weekday names ("Saturday, sun"). Unknown names are skipped.
pub fn parse_weekdays(raw: &str) -> Vec<Weekday> {
    let mut days = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match name.parse::<Weekday>() {
            Ok(day) if !days.contains(&day) => days.push(day),
            Ok(_) => {}
            Err(_) => tracing::warn!(weekday = name, "ignoring unknown weekend day name"),
        }
    }
    days
}

/// Raw `attendance_policy` row; every column is optional.
#[derive(Debug, Clone, Default, FromRow)]
pub struct PolicyRow {
    pub weekend_days: Option<String>,
    pub office_start: Option<NaiveTime>,
    pub office_end: Option<NaiveTime>,
    pub late_mark_grace_minutes: Option<i32>,
    pub overtime_grace_minutes: Option<i32>,
    pub present_symbol: Option<String>,
    pub absent_symbol: Option<String>,
    pub holiday_symbol: Option<String>,
    pub default_leave_symbol: Option<String>,
}
