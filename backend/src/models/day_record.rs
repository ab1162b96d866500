use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::EmployeeId;

/// Classification of a single (employee, date), in rule precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    Leave,
    HolidayPresent,
    Holiday,
    Present,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Remark {
    #[serde(rename = "On Leave")]
    OnLeave,
    #[serde(rename = "Present on Holiday")]
    PresentOnHoliday,
    #[serde(rename = "Currently Working")]
    CurrentlyWorking,
    #[serde(rename = "Not Punched Out")]
    NotPunchedOut,
    Holiday,
    Present,
    Absent,
}

impl Remark {
    pub fn label(&self) -> &'static str {
        match self {
            Remark::OnLeave => "On Leave",
            Remark::PresentOnHoliday => "Present on Holiday",
            Remark::CurrentlyWorking => "Currently Working",
            Remark::NotPunchedOut => "Not Punched Out",
            Remark::Holiday => "Holiday",
            Remark::Present => "Present",
            Remark::Absent => "Absent",
        }
    }
}

/// The derived attendance row for one employee on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DayRecord {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub kind: DayKind,
    /// Sheet symbol: a leave symbol or the policy's present/absent/holiday symbol.
    pub status: String,
    pub remarks: Remark,
    pub punch_in: Option<NaiveDateTime>,
    pub punch_out: Option<NaiveDateTime>,
    pub total_minutes: i64,
    /// `total_minutes` rendered as `HH:MM`.
    pub total_work_hours: String,
    pub leave_type: Option<String>,
    pub is_weekend: bool,
}
