//! Turns one day's session aggregate plus holiday/leave context into a [`DayRecord`].
//!
//! Classification is an ordered list of guards; the first guard that holds decides the
//! [`DayKind`]. Leave is checked before holiday, so a holiday that falls inside approved
//! leave is recorded as leave.

use chrono::NaiveDate;

use crate::{
    models::{
        day_record::{DayKind, DayRecord, Remark},
        holiday::Holiday,
        leave::LeaveRecord,
        policy::AttendancePolicy,
        punch_event::PunchEvent,
    },
    services::{
        calendar::{self, DateRange},
        grouping::{group_punches, GroupKey, Grouping},
        session::{self, SessionAggregate},
    },
    types::EmployeeId,
    utils::time::format_minutes,
};

#[derive(Debug, Clone, Copy)]
pub struct DayContext<'a> {
    pub date: NaiveDate,
    pub session: &'a SessionAggregate,
    pub is_holiday: bool,
    pub leave: Option<&'a LeaveRecord>,
    pub is_today: bool,
    pub is_weekend: bool,
}

type Guard = fn(&DayContext) -> bool;

fn on_leave(ctx: &DayContext) -> bool {
    ctx.leave.is_some()
}

fn worked_on_holiday(ctx: &DayContext) -> bool {
    ctx.is_holiday && ctx.session.has_any_punch
}

fn idle_holiday(ctx: &DayContext) -> bool {
    ctx.is_holiday
}

fn punched(ctx: &DayContext) -> bool {
    ctx.session.has_any_punch
}

fn always(_: &DayContext) -> bool {
    true
}

/// Evaluated top to bottom; later guards assume the earlier ones failed.
const RULES: [(Guard, DayKind); 5] = [
    (on_leave, DayKind::Leave),
    (worked_on_holiday, DayKind::HolidayPresent),
    (idle_holiday, DayKind::Holiday),
    (punched, DayKind::Present),
    (always, DayKind::Absent),
];

pub fn classify_kind(ctx: &DayContext) -> DayKind {
    RULES
        .iter()
        .find(|(guard, _)| guard(ctx))
        .map(|(_, kind)| *kind)
        .unwrap_or(DayKind::Absent)
}

fn worked_remark(ctx: &DayContext, completed: Remark) -> Remark {
    if ctx.session.total_minutes > 0 {
        completed
    } else if ctx.is_today {
        Remark::CurrentlyWorking
    } else {
        Remark::NotPunchedOut
    }
}

pub fn remark_for(kind: DayKind, ctx: &DayContext) -> Remark {
    match kind {
        DayKind::Leave => Remark::OnLeave,
        DayKind::HolidayPresent => worked_remark(ctx, Remark::PresentOnHoliday),
        DayKind::Holiday => Remark::Holiday,
        DayKind::Present => worked_remark(ctx, Remark::Present),
        DayKind::Absent => Remark::Absent,
    }
}

fn status_for(kind: DayKind, ctx: &DayContext, policy: &AttendancePolicy) -> String {
    let symbols = &policy.symbols;
    match kind {
        DayKind::Leave => ctx
            .leave
            .and_then(|leave| leave.symbol.clone())
            .filter(|symbol| !symbol.trim().is_empty())
            .unwrap_or_else(|| symbols.default_leave.clone()),
        DayKind::HolidayPresent | DayKind::Present => symbols.present.clone(),
        DayKind::Holiday => symbols.holiday.clone(),
        DayKind::Absent => symbols.absent.clone(),
    }
}

pub fn classify(employee_id: EmployeeId, ctx: &DayContext, policy: &AttendancePolicy) -> DayRecord {
    let kind = classify_kind(ctx);
    DayRecord {
        employee_id,
        date: ctx.date,
        kind,
        status: status_for(kind, ctx, policy),
        remarks: remark_for(kind, ctx),
        punch_in: ctx.session.first_punch_in,
        punch_out: ctx.session.last_completed_punch_out,
        total_minutes: ctx.session.total_minutes,
        total_work_hours: format_minutes(ctx.session.total_minutes),
        leave_type: ctx.leave.map(|leave| leave.leave_type.clone()),
        is_weekend: ctx.is_weekend,
    }
}

/// One [`DayRecord`] per calendar day of `range` for `employee_id`.
///
/// Punches and leaves belonging to other employees are ignored. When several leave
/// records cover the same date the earliest-starting one wins.
pub fn build_day_records(
    employee_id: EmployeeId,
    range: DateRange,
    today: NaiveDate,
    policy: &AttendancePolicy,
    holidays: &[Holiday],
    leaves: &[LeaveRecord],
    punches: &[PunchEvent],
) -> Vec<DayRecord> {
    let own_punches = punches
        .iter()
        .filter(|event| event.employee_id == employee_id && range.contains(event.date));
    let by_day = group_punches(own_punches, Grouping::EmployeeDate);

    let mut own_leaves: Vec<&LeaveRecord> = leaves
        .iter()
        .filter(|leave| leave.employee_id == employee_id)
        .collect();
    own_leaves.sort_by_key(|leave| (leave.from_date, leave.id));

    range
        .days()
        .map(|date| {
            let key = GroupKey {
                employee_id,
                date: Some(date),
            };
            let day_events = by_day.get(&key).map(Vec::as_slice).unwrap_or_default();
            let session = session::aggregate(day_events.iter().copied());
            let ctx = DayContext {
                date,
                session: &session,
                is_holiday: calendar::is_holiday(date, holidays),
                leave: own_leaves.iter().copied().find(|leave| leave.covers(date)),
                is_today: date == today,
                is_weekend: policy.is_weekend(date),
            };
            classify(employee_id, &ctx, policy)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, Utc};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        d(day).and_hms_opt(h, m, 0).unwrap()
    }

    fn ctx<'a>(
        session: &'a SessionAggregate,
        is_holiday: bool,
        leave: Option<&'a LeaveRecord>,
        is_today: bool,
    ) -> DayContext<'a> {
        DayContext {
            date: d(3),
            session,
            is_holiday,
            leave,
            is_today,
            is_weekend: false,
        }
    }

    fn worked(minutes: i64) -> SessionAggregate {
        SessionAggregate {
            total_minutes: minutes,
            first_punch_in: Some(at(3, 9, 0)),
            last_completed_punch_out: (minutes > 0).then(|| at(3, 17, 0)),
            has_any_punch: true,
        }
    }

    fn leave(symbol: Option<&str>) -> LeaveRecord {
        LeaveRecord::new(
            EmployeeId::new(),
            "Sick",
            symbol.map(str::to_string),
            d(1),
            d(5),
        )
    }

    #[test]
    fn leave_beats_holiday_and_punches() {
        let session = worked(480);
        let sick = leave(Some("SL"));
        let c = ctx(&session, true, Some(&sick), false);
        let record = classify(EmployeeId::new(), &c, &AttendancePolicy::default());
        assert_eq!(record.kind, DayKind::Leave);
        assert_eq!(record.status, "SL");
        assert_eq!(record.remarks, Remark::OnLeave);
        assert_eq!(record.punch_in, Some(at(3, 9, 0)));
        assert_eq!(record.leave_type.as_deref(), Some("Sick"));
    }

    #[test]
    fn unmapped_leave_uses_default_symbol() {
        let session = SessionAggregate::default();
        let unmapped = leave(None);
        let c = ctx(&session, false, Some(&unmapped), false);
        let record = classify(EmployeeId::new(), &c, &AttendancePolicy::default());
        assert_eq!(record.status, "/");
    }

    #[test]
    fn holiday_with_completed_work_is_present_on_holiday() {
        let session = worked(240);
        let c = ctx(&session, true, None, false);
        let record = classify(EmployeeId::new(), &c, &AttendancePolicy::default());
        assert_eq!(record.kind, DayKind::HolidayPresent);
        assert_eq!(record.status, "P");
        assert_eq!(record.remarks, Remark::PresentOnHoliday);
        assert_eq!(record.total_work_hours, "04:00");
    }

    #[test]
    fn holiday_with_open_session_depends_on_today() {
        let session = worked(0);
        let today = ctx(&session, true, None, true);
        assert_eq!(remark_for(classify_kind(&today), &today), Remark::CurrentlyWorking);
        let past = ctx(&session, true, None, false);
        assert_eq!(remark_for(classify_kind(&past), &past), Remark::NotPunchedOut);
    }

    #[test]
    fn idle_holiday_is_holiday() {
        let session = SessionAggregate::default();
        let c = ctx(&session, true, None, false);
        let record = classify(EmployeeId::new(), &c, &AttendancePolicy::default());
        assert_eq!(record.kind, DayKind::Holiday);
        assert_eq!(record.status, "H");
        assert_eq!(record.remarks, Remark::Holiday);
    }

    #[test]
    fn workday_rules() {
        let policy = AttendancePolicy::default();

        let session = worked(300);
        let c = ctx(&session, false, None, false);
        let record = classify(EmployeeId::new(), &c, &policy);
        assert_eq!((record.kind, record.remarks), (DayKind::Present, Remark::Present));

        let open = worked(0);
        let c = ctx(&open, false, None, true);
        assert_eq!(classify(EmployeeId::new(), &c, &policy).remarks, Remark::CurrentlyWorking);
        let c = ctx(&open, false, None, false);
        assert_eq!(classify(EmployeeId::new(), &c, &policy).remarks, Remark::NotPunchedOut);

        let none = SessionAggregate::default();
        let c = ctx(&none, false, None, false);
        let record = classify(EmployeeId::new(), &c, &policy);
        assert_eq!(record.kind, DayKind::Absent);
        assert_eq!(record.status, "A");
        assert_eq!(record.remarks, Remark::Absent);
        assert_eq!(record.total_work_hours, "00:00");
    }

    #[test]
    fn build_day_records_covers_every_day_and_is_idempotent() {
        let employee = EmployeeId::new();
        let other = EmployeeId::new();
        let now = Utc::now();

        let mut monday = PunchEvent::open(employee, at(3, 9, 10), None, now);
        monday.punch_out = Some(at(3, 18, 5));
        let mut stranger = PunchEvent::open(other, at(4, 9, 0), None, now);
        stranger.punch_out = Some(at(4, 17, 0));
        let open_today = PunchEvent::open(employee, at(5, 8, 0), None, now);
        let punches = vec![monday, stranger, open_today];

        let holidays = vec![Holiday::new("Midsummer", d(6), d(6))];
        let leaves = vec![LeaveRecord::new(employee, "Annual", Some("AL".into()), d(7), d(7))];
        let range = DateRange::new(d(3), d(7)).unwrap();
        let policy = AttendancePolicy::default();

        let records = build_day_records(employee, range, d(5), &policy, &holidays, &leaves, &punches);
        let again = build_day_records(employee, range, d(5), &policy, &holidays, &leaves, &punches);
        assert_eq!(records, again);

        let kinds: Vec<_> = records.iter().map(|r| (r.date, r.kind, r.remarks)).collect();
        assert_eq!(
            kinds,
            vec![
                (d(3), DayKind::Present, Remark::Present),
                (d(4), DayKind::Absent, Remark::Absent),
                (d(5), DayKind::Present, Remark::CurrentlyWorking),
                (d(6), DayKind::Holiday, Remark::Holiday),
                (d(7), DayKind::Leave, Remark::OnLeave),
            ]
        );
        assert_eq!(records[0].total_minutes, 535);
        assert_eq!(records[0].total_work_hours, "08:55");
        assert_eq!(records[0].punch_out, Some(at(3, 18, 5)));
        assert_eq!(records[2].punch_out, None);
    }
}
