//! Attendance policy store read.

use sqlx::PgPool;

use crate::error::AppError;
use crate::models::policy::PolicyRow;

#[derive(Debug, Default, Clone, Copy)]
pub struct PolicyRepository;

impl PolicyRepository {
    pub fn new() -> Self {
        Self
    }

    /// The stored policy row, if the organization has configured one.
    pub async fn fetch(&self, db: &PgPool) -> Result<Option<PolicyRow>, AppError> {
        let row = sqlx::query_as::<_, PolicyRow>(
            "SELECT weekend_days, office_start, office_end, late_mark_grace_minutes, \
             overtime_grace_minutes, present_symbol, absent_symbol, holiday_symbol, \
             default_leave_symbol FROM attendance_policy LIMIT 1",
        )
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}
