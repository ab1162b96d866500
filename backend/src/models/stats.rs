use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::EmployeeId;

/// Which employees a statistics request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatsScope {
    Employee { employee_id: EmployeeId },
    Organization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyStats {
    pub scope: StatsScope,
    pub year: i32,
    pub month: u32,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub employee_count: i64,
    /// Working days in the range, per employee.
    pub total_working_days: i64,
    /// `total_working_days * employee_count`.
    pub expected_days: i64,
    pub present_days: i64,
    pub absent_days: i64,
    pub late_arrivals: i64,
    pub overtime_minutes: i64,
    pub total_worked_minutes: i64,
    /// Leave days per leave type, clipped to the month.
    pub leave_breakdown: BTreeMap<String, i64>,
    pub attendance_percentage: f64,
    pub average_work_hours_per_day: f64,
    /// Filled in organization scope only.
    pub per_employee: Vec<EmployeeMonthlySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeMonthlySummary {
    pub employee_id: EmployeeId,
    pub present_days: i64,
    pub late_arrivals: i64,
    pub overtime_minutes: i64,
    pub worked_minutes: i64,
}
