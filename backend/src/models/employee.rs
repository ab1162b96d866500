//! Roster entries consumed by the attendance engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::EmployeeId;

/// A roster employee. Only rows with `is_tracked` take part in attendance statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: EmployeeId,
    pub display_name: String,
    /// Role flag marking the employee as attendance-tracked.
    pub is_tracked: bool,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: EmployeeId::new(),
            display_name: display_name.into(),
            is_tracked: true,
            created_at: Utc::now(),
        }
    }
}

/// Search/pagination filter for roster reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilter {
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl RosterFilter {
    pub fn new(search: Option<String>, limit: i64, offset: i64) -> Self {
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            search,
            limit,
            offset,
        }
    }

    /// True when `employee` passes the search term (case-insensitive substring of the name).
    pub fn matches(&self, employee: &Employee) -> bool {
        match &self.search {
            Some(term) => employee
                .display_name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            None => true,
        }
    }
}
