use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::HolidayId;

/// An organization-wide holiday covering `from_date..=to_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Holiday {
    pub id: HolidayId,
    pub name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl Holiday {
    pub fn new(name: impl Into<String>, from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self {
            id: HolidayId::new(),
            name: name.into(),
            from_date,
            to_date,
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from_date <= date && date <= self.to_date
    }
}
