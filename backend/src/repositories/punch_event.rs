//! Punch event persistence, including the open/close session write path.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::punch_event::PunchEvent;
use crate::repositories::common::push_clause;
use crate::repositories::transaction::{begin_transaction, commit_transaction};
use crate::types::{EmployeeId, PunchEventId};

const SELECT_COLUMNS: &str = "id, employee_id, date, punch_in, punch_out, punch_in_location, \
     punch_out_location, created_at, updated_at";

/// Repository trait for punch events.
///
/// Use `MockPunchEventRepositoryTrait` in tests to mock the behavior.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PunchEventRepositoryTrait: Send + Sync {
    /// Insert a new open session; fails with `Conflict` if the employee already has one.
    async fn open_session(&self, db: &PgPool, event: &PunchEvent) -> Result<PunchEvent, AppError>;

    /// Stamp punch-out on the employee's open session, whatever day it was opened on.
    async fn close_session(
        &self,
        db: &PgPool,
        employee_id: EmployeeId,
        punch_out: NaiveDateTime,
        location: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<PunchEvent, AppError>;

    /// Events whose attendance date lies in `[from, to]`; `None` reads every employee.
    async fn find_in_range(
        &self,
        db: &PgPool,
        employee_id: Option<EmployeeId>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PunchEvent>, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PunchEventRepository;

impl PunchEventRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PunchEventRepositoryTrait for PunchEventRepository {
    async fn open_session(&self, db: &PgPool, event: &PunchEvent) -> Result<PunchEvent, AppError> {
        let mut tx = begin_transaction(db).await?;

        let employee: Option<EmployeeId> =
            sqlx::query_scalar("SELECT id FROM employees WHERE id = $1 FOR UPDATE")
                .bind(event.employee_id)
                .fetch_optional(&mut *tx)
                .await?;
        if employee.is_none() {
            return Err(AppError::NotFound("Employee not found".into()));
        }

        let open: Option<PunchEventId> = sqlx::query_scalar(
            "SELECT id FROM punch_events WHERE employee_id = $1 AND punch_out IS NULL FOR UPDATE",
        )
        .bind(event.employee_id)
        .fetch_optional(&mut *tx)
        .await?;
        if open.is_some() {
            return Err(AppError::Conflict(
                "Employee already has an open punch session".into(),
            ));
        }

        let query = format!(
            "INSERT INTO punch_events (id, employee_id, date, punch_in, punch_out, \
             punch_in_location, punch_out_location, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, PunchEvent>(&query)
            .bind(event.id)
            .bind(event.employee_id)
            .bind(event.date)
            .bind(event.punch_in)
            .bind(event.punch_out)
            .bind(&event.punch_in_location)
            .bind(&event.punch_out_location)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&mut *tx)
            .await?;

        commit_transaction(tx).await?;
        Ok(row)
    }

    async fn close_session(
        &self,
        db: &PgPool,
        employee_id: EmployeeId,
        punch_out: NaiveDateTime,
        location: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<PunchEvent, AppError> {
        let mut tx = begin_transaction(db).await?;

        let open: Option<PunchEventId> = sqlx::query_scalar(
            "SELECT id FROM punch_events WHERE employee_id = $1 AND punch_out IS NULL \
             ORDER BY punch_in DESC LIMIT 1 FOR UPDATE",
        )
        .bind(employee_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(open_id) = open else {
            return Err(AppError::BadRequest(
                "No open punch session to close".into(),
            ));
        };

        let query = format!(
            "UPDATE punch_events SET punch_out = $2, punch_out_location = $3, updated_at = $4 \
             WHERE id = $1 RETURNING {}",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, PunchEvent>(&query)
            .bind(open_id)
            .bind(punch_out)
            .bind(location)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        commit_transaction(tx).await?;
        Ok(row)
    }

    async fn find_in_range(
        &self,
        db: &PgPool,
        employee_id: Option<EmployeeId>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PunchEvent>, AppError> {
        let mut builder = range_query(employee_id, from, to);
        let rows = builder.build_query_as::<PunchEvent>().fetch_all(db).await?;
        Ok(rows)
    }
}

fn range_query<'a>(
    employee_id: Option<EmployeeId>,
    from: NaiveDate,
    to: NaiveDate,
) -> QueryBuilder<'a, Postgres> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {} FROM punch_events", SELECT_COLUMNS));
    let mut has_clause = false;
    if let Some(employee_id) = employee_id {
        push_clause(&mut builder, &mut has_clause);
        builder.push("employee_id = ").push_bind(employee_id);
    }
    push_clause(&mut builder, &mut has_clause);
    builder
        .push("date BETWEEN ")
        .push_bind(from)
        .push(" AND ")
        .push_bind(to);
    builder.push(" ORDER BY employee_id, date, punch_in");
    builder
}
