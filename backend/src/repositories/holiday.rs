//! Holiday calendar reads.

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::holiday::Holiday;
use crate::repositories::common::push_overlap;

const SELECT_COLUMNS: &str = "id, name, from_date, to_date";

#[derive(Debug, Default, Clone, Copy)]
pub struct HolidayRepository;

impl HolidayRepository {
    pub fn new() -> Self {
        Self
    }

    /// Holidays whose span intersects `[from, to]`.
    pub async fn find_overlapping(
        &self,
        db: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Holiday>, AppError> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM holidays", SELECT_COLUMNS));
        let mut has_clause = false;
        push_overlap(&mut builder, &mut has_clause, "from_date", "to_date", from, to);
        builder.push(" ORDER BY from_date ASC");
        let rows = builder.build_query_as::<Holiday>().fetch_all(db).await?;
        Ok(rows)
    }
}
