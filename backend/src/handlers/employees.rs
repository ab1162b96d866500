use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::extract::ApiQuery,
    models::{
        employee::{Employee, RosterFilter},
        PaginatedResponse, Page,
    },
    state::AppState,
};

#[derive(Debug, Deserialize, IntoParams, ToSchema, Validate)]
#[into_params(parameter_in = Query)]
pub struct EmployeeListQuery {
    #[validate(length(max = 100))]
    pub search: Option<String>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}

pub async fn list_employees(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmployeeListQuery>,
) -> Result<Json<PaginatedResponse<Employee>>, AppError> {
    query.validate()?;
    let page = Page::resolve(query.limit, query.offset);
    let filter = RosterFilter::new(query.search, page.limit, page.offset);
    let roster = state.attendance.roster(filter).await?;
    Ok(Json(roster))
}
