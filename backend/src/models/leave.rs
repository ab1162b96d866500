use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::{EmployeeId, LeaveRecordId, LeaveTypeId};

/// Approved leave covering `from_date..=to_date`, with its type symbol already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveRecord {
    pub id: LeaveRecordId,
    pub employee_id: EmployeeId,
    pub leave_type_id: LeaveTypeId,
    /// Display name of the leave type; also the key of the monthly leave breakdown.
    pub leave_type: String,
    /// Attendance-sheet symbol configured for the type, if any.
    pub symbol: Option<String>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl LeaveRecord {
    pub fn new(
        employee_id: EmployeeId,
        leave_type: impl Into<String>,
        symbol: Option<String>,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Self {
        Self {
            id: LeaveRecordId::new(),
            employee_id,
            leave_type_id: LeaveTypeId::new(),
            leave_type: leave_type.into(),
            symbol,
            from_date,
            to_date,
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from_date <= date && date <= self.to_date
    }
}
