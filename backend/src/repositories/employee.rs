//! Employee roster reads.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::employee::{Employee, RosterFilter};
use crate::repositories::common::{like_pattern, push_clause};
use crate::types::EmployeeId;

const SELECT_COLUMNS: &str = "id, display_name, is_tracked, created_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct EmployeeRepository;

impl EmployeeRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id(&self, db: &PgPool, id: EmployeeId) -> Result<Employee, AppError> {
        let query = format!("SELECT {} FROM employees WHERE id = $1", SELECT_COLUMNS);
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".into()))
    }

    /// Tracked employees matching the filter, ordered by name, plus the unpaginated total.
    pub async fn search_tracked(
        &self,
        db: &PgPool,
        filter: &RosterFilter,
    ) -> Result<(Vec<Employee>, i64), AppError> {
        let mut count_builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM employees");
        apply_filter(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(db)
            .await?;

        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM employees", SELECT_COLUMNS));
        apply_filter(&mut builder, filter);
        builder
            .push(" ORDER BY display_name ASC, id ASC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);
        let rows = builder.build_query_as::<Employee>().fetch_all(db).await?;

        Ok((rows, total))
    }

    pub async fn tracked_ids(&self, db: &PgPool) -> Result<Vec<EmployeeId>, AppError> {
        let ids = sqlx::query_scalar::<_, EmployeeId>(
            "SELECT id FROM employees WHERE is_tracked = TRUE ORDER BY display_name ASC, id ASC",
        )
        .fetch_all(db)
        .await?;
        Ok(ids)
    }
}

fn apply_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &RosterFilter) {
    let mut has_clause = false;
    push_clause(builder, &mut has_clause);
    builder.push("is_tracked = TRUE");
    if let Some(search) = filter.search.as_deref() {
        push_clause(builder, &mut has_clause);
        builder
            .push("display_name ILIKE ")
            .push_bind(like_pattern(search));
    }
}
