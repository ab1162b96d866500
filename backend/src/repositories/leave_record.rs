//! Approved leave reads, joined with their leave type.

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::leave::LeaveRecord;
use crate::repositories::common::{push_clause, push_overlap};
use crate::types::EmployeeId;

const SELECT_SQL: &str = "SELECT lr.id, lr.employee_id, lr.leave_type_id, \
     lt.name AS leave_type, lt.symbol, lr.from_date, lr.to_date \
     FROM leave_records lr JOIN leave_types lt ON lt.id = lr.leave_type_id";

#[derive(Debug, Default, Clone, Copy)]
pub struct LeaveRecordRepository;

impl LeaveRecordRepository {
    pub fn new() -> Self {
        Self
    }

    /// Leave spans intersecting `[from, to]`; `None` reads every employee.
    pub async fn find_overlapping(
        &self,
        db: &PgPool,
        employee_id: Option<EmployeeId>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LeaveRecord>, AppError> {
        let mut builder = build_overlap_query(employee_id, from, to);
        let rows = builder.build_query_as::<LeaveRecord>().fetch_all(db).await?;
        Ok(rows)
    }
}

fn build_overlap_query<'a>(
    employee_id: Option<EmployeeId>,
    from: NaiveDate,
    to: NaiveDate,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(SELECT_SQL);
    let mut has_clause = false;
    if let Some(employee_id) = employee_id {
        push_clause(&mut builder, &mut has_clause);
        builder.push("lr.employee_id = ").push_bind(employee_id);
    }
    push_overlap(
        &mut builder,
        &mut has_clause,
        "lr.from_date",
        "lr.to_date",
        from,
        to,
    );
    builder.push(" ORDER BY lr.employee_id, lr.from_date");
    builder
}
