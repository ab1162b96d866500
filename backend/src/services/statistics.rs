//! Folds punches, leave and holiday data for a month into [`MonthlyStats`].
//!
//! Single-employee and organization scopes share one reducer: per-day facts come from the
//! (employee, date) grouping and are summed, so both views count late arrivals and
//! overtime the same way.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    models::{
        holiday::Holiday,
        leave::LeaveRecord,
        policy::{seconds_of_day, AttendancePolicy},
        punch_event::PunchEvent,
        stats::{EmployeeMonthlySummary, MonthlyStats, StatsScope},
    },
    services::{
        calendar::{self, DateRange},
        grouping::{group_punches, GroupKey, Grouping},
        session,
    },
    types::EmployeeId,
};

pub struct StatsInput<'a> {
    pub scope: StatsScope,
    pub year: i32,
    pub month: u32,
    /// Statistics window (the month, cut at today for the current month).
    pub range: DateRange,
    /// Whole month; leave is clipped to this rather than to `range`.
    pub month_range: DateRange,
    pub employees: &'a [EmployeeId],
    pub policy: &'a AttendancePolicy,
    pub holidays: &'a [Holiday],
    pub leaves: &'a [LeaveRecord],
    pub punches: &'a [PunchEvent],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub present_days: i64,
    pub late_arrivals: i64,
    pub overtime_minutes: i64,
    pub worked_minutes: i64,
}

impl Totals {
    fn plus(self, other: Totals) -> Totals {
        Totals {
            present_days: self.present_days + other.present_days,
            late_arrivals: self.late_arrivals + other.late_arrivals,
            overtime_minutes: self.overtime_minutes + other.overtime_minutes,
            worked_minutes: self.worked_minutes + other.worked_minutes,
        }
    }
}

/// Facts for one (employee, date) group of punches.
pub fn day_totals(events: &[&PunchEvent], policy: &AttendancePolicy) -> Totals {
    if events.is_empty() {
        return Totals::default();
    }
    let day = session::aggregate(events.iter().copied());

    let late = day
        .first_punch_in
        .map(|first| seconds_of_day(first.time()) > policy.late_cutoff_seconds())
        .unwrap_or(false);

    let overtime_minutes = day
        .last_completed_punch_out
        .map(|last| (seconds_of_day(last.time()) - policy.overtime_cutoff_seconds()).max(0) / 60)
        .unwrap_or(0);

    Totals {
        present_days: 1,
        late_arrivals: i64::from(late),
        overtime_minutes,
        worked_minutes: day.total_minutes,
    }
}

/// Sums [`day_totals`] over every (employee, date) group in `events`.
pub fn summarize<'a, I>(events: I, policy: &AttendancePolicy) -> Totals
where
    I: IntoIterator<Item = &'a PunchEvent>,
{
    group_punches(events, Grouping::EmployeeDate)
        .values()
        .map(|day| day_totals(day, policy))
        .fold(Totals::default(), Totals::plus)
}

/// Inclusive leave days per leave type, each record clipped to `month`.
pub fn leave_breakdown<'a, I>(leaves: I, month: DateRange) -> BTreeMap<String, i64>
where
    I: IntoIterator<Item = &'a LeaveRecord>,
{
    leaves
        .into_iter()
        .filter_map(|leave| {
            month
                .clip(leave.from_date, leave.to_date)
                .map(|clipped| (leave.leave_type.clone(), clipped.len_days()))
        })
        .fold(BTreeMap::new(), |mut acc, (leave_type, days)| {
            *acc.entry(leave_type).or_insert(0) += days;
            acc
        })
}

/// `value` rounded to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `numerator / denominator * 100`, or 0 when the denominator is 0.
pub fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    round2(numerator as f64 / denominator as f64 * 100.0)
}

/// Average hours per present day, or 0 when nobody was present.
pub fn average_hours(worked_minutes: i64, present_days: i64) -> f64 {
    if present_days <= 0 {
        return 0.0;
    }
    round2(worked_minutes as f64 / present_days as f64 / 60.0)
}

pub fn compute_monthly_stats(input: &StatsInput<'_>) -> MonthlyStats {
    let members: BTreeSet<EmployeeId> = input.employees.iter().copied().collect();
    let scoped: Vec<&PunchEvent> = input
        .punches
        .iter()
        .filter(|event| members.contains(&event.employee_id) && input.range.contains(event.date))
        .collect();

    let totals = summarize(scoped.iter().copied(), input.policy);

    let per_employee = match input.scope {
        StatsScope::Employee { .. } => Vec::new(),
        StatsScope::Organization => {
            let by_employee = group_punches(scoped.iter().copied(), Grouping::Employee);
            members
                .iter()
                .map(|employee_id| {
                    let key = GroupKey {
                        employee_id: *employee_id,
                        date: None,
                    };
                    let employee_totals = by_employee
                        .get(&key)
                        .map(|events| summarize(events.iter().copied(), input.policy))
                        .unwrap_or_default();
                    EmployeeMonthlySummary {
                        employee_id: *employee_id,
                        present_days: employee_totals.present_days,
                        late_arrivals: employee_totals.late_arrivals,
                        overtime_minutes: employee_totals.overtime_minutes,
                        worked_minutes: employee_totals.worked_minutes,
                    }
                })
                .collect()
        }
    };

    let employee_count = members.len() as i64;
    let total_working_days =
        calendar::working_days(input.range, &input.policy.weekend_days, input.holidays);
    let expected_days = total_working_days * employee_count;

    let scoped_leaves = input
        .leaves
        .iter()
        .filter(|leave| members.contains(&leave.employee_id));

    MonthlyStats {
        scope: input.scope,
        year: input.year,
        month: input.month,
        range_start: input.range.start(),
        range_end: input.range.end(),
        employee_count,
        total_working_days,
        expected_days,
        present_days: totals.present_days,
        absent_days: (expected_days - totals.present_days).max(0),
        late_arrivals: totals.late_arrivals,
        overtime_minutes: totals.overtime_minutes,
        total_worked_minutes: totals.worked_minutes,
        leave_breakdown: leave_breakdown(scoped_leaves, input.month_range),
        attendance_percentage: percentage(totals.present_days, expected_days),
        average_work_hours_per_day: average_hours(totals.worked_minutes, totals.present_days),
        per_employee,
    }
}
