//! Data models shared across database access, the attendance engine and API handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod day_record;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod policy;
pub mod punch_event;
pub mod stats;

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 500;

/// Resolved roster page: default limit applied, limit kept within `1..=MAX_PAGE_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn resolve(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    /// Matching rows before `limit`/`offset` were applied.
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: Page) -> Self {
        Self {
            data,
            total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}
