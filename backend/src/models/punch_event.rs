use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::types::{EmployeeId, PunchEventId};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// One punch cycle. `punch_out` is `None` while the session is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PunchEvent {
    pub id: PunchEventId,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub punch_in: NaiveDateTime,
    pub punch_out: Option<NaiveDateTime>,
    pub punch_in_location: Option<String>,
    pub punch_out_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PunchEvent {
    pub fn open(
        employee_id: EmployeeId,
        punch_in: NaiveDateTime,
        location: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PunchEventId::new(),
            employee_id,
            date: punch_in.date(),
            punch_in,
            punch_out: None,
            punch_in_location: location,
            punch_out_location: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.punch_out.is_none()
    }

    /// Minutes worked in this cycle, or `None` while the session is still open.
    pub fn completed_minutes(&self) -> Option<i64> {
        self.punch_out
            .map(|punch_out| elapsed_minutes(self.punch_in, punch_out))
    }
}

/// Elapsed whole minutes between two punches, compared by time of day.
///
/// A punch-out whose time of day is earlier than the punch-in is taken to fall on the
/// following day, so an overnight shift never yields a negative duration.
pub fn elapsed_minutes(punch_in: NaiveDateTime, punch_out: NaiveDateTime) -> i64 {
    let start = punch_in.time();
    let end = punch_out.time();
    let mut seconds = (end - start).num_seconds();
    if end < start {
        seconds += SECONDS_PER_DAY;
    }
    seconds / 60
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PunchInRequest {
    pub employee_id: EmployeeId,
    #[validate(length(max = 255))]
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PunchOutRequest {
    pub employee_id: EmployeeId,
    #[validate(length(max = 255))]
    #[serde(default)]
    pub location: Option<String>,
}
