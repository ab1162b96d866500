use axum::{extract::State, Json};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::{
    error::AppError,
    handlers::extract::{ApiJson, ApiQuery},
    models::{
        day_record::DayRecord,
        employee::RosterFilter,
        punch_event::{PunchEvent, PunchInRequest, PunchOutRequest},
        stats::{MonthlyStats, StatsScope},
        Page,
    },
    services::{attendance::DayRecordBatch, calendar::DateRange},
    state::AppState,
    types::EmployeeId,
    utils::time,
    validation::rules,
};

#[derive(Debug, Deserialize, IntoParams, ToSchema, Validate)]
#[into_params(parameter_in = Query)]
#[validate(schema(function = "check_day_window"))]
pub struct DayRecordsQuery {
    pub employee_id: EmployeeId,
    /// First day (default: first day of the current month).
    pub from: Option<NaiveDate>,
    /// Last day (default: today).
    pub to: Option<NaiveDate>,
}

fn check_day_window(query: &DayRecordsQuery) -> Result<(), ValidationError> {
    rules::validate_window_order(query.from, query.to)
}

#[derive(Debug, Deserialize, IntoParams, ToSchema, Validate)]
#[into_params(parameter_in = Query)]
#[validate(schema(function = "check_batch_window"))]
pub struct DayRecordsBatchQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Case-insensitive name filter.
    #[validate(length(max = 100))]
    pub search: Option<String>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}

fn check_batch_window(query: &DayRecordsBatchQuery) -> Result<(), ValidationError> {
    rules::validate_window_order(query.from, query.to)
}

#[derive(Debug, Deserialize, IntoParams, ToSchema, Validate)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Single-employee scope; organization scope when absent.
    pub employee_id: Option<EmployeeId>,
    #[validate(range(min = 1970, max = 9999))]
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 12))]
    pub month: Option<u32>,
}

pub async fn punch_in(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PunchInRequest>,
) -> Result<Json<PunchEvent>, AppError> {
    let event = state.punches.punch_in(payload).await?;
    Ok(Json(event))
}

pub async fn punch_out(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PunchOutRequest>,
) -> Result<Json<PunchEvent>, AppError> {
    let event = state.punches.punch_out(payload).await?;
    Ok(Json(event))
}

pub async fn day_records(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DayRecordsQuery>,
) -> Result<Json<Vec<DayRecord>>, AppError> {
    query.validate()?;
    let today = time::today_local(&state.config.time_zone);
    let range = resolve_range(query.from, query.to, today, state.config.max_range_days)?;

    let records = state
        .attendance
        .day_records(query.employee_id, range, today)
        .await?;
    Ok(Json(records))
}

pub async fn day_records_batch(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DayRecordsBatchQuery>,
) -> Result<Json<DayRecordBatch>, AppError> {
    query.validate()?;
    let today = time::today_local(&state.config.time_zone);
    let range = resolve_range(query.from, query.to, today, state.config.max_range_days)?;
    let page = Page::resolve(query.limit, query.offset);
    let filter = RosterFilter::new(query.search, page.limit, page.offset);

    let batch = state
        .attendance
        .day_records_batch(filter, range, today)
        .await?;
    if !batch.failures.is_empty() {
        tracing::warn!(
            failures = batch.failures.len(),
            returned = batch.data.len(),
            "Day record batch completed with failures"
        );
    }
    Ok(Json(batch))
}

pub async fn monthly_stats(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> Result<Json<MonthlyStats>, AppError> {
    query.validate()?;
    let today = time::today_local(&state.config.time_zone);
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    let scope = match query.employee_id {
        Some(employee_id) => StatsScope::Employee { employee_id },
        None => StatsScope::Organization,
    };

    let stats = state
        .attendance
        .monthly_stats(scope, year, month, today)
        .await?;
    Ok(Json(stats))
}

/// Fills in the default window (current month up to today) and enforces the length cap.
fn resolve_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
    max_days: i64,
) -> Result<DateRange, AppError> {
    let end = to.unwrap_or(today);
    let start = from.unwrap_or_else(|| end.with_day(1).unwrap_or(end));
    let range = DateRange::new(start, end)?;
    rules::validate_window_length(range, max_days)
        .map_err(|err| AppError::Validation(vec![format!("to: {}", err.code)]))?;
    Ok(range)
}
