use axum::{extract::State, Json};

use crate::{error::AppError, models::policy::AttendancePolicy, state::AppState};

pub async fn effective_policy(
    State(state): State<AppState>,
) -> Result<Json<AttendancePolicy>, AppError> {
    let policy = state.attendance.policy().await?;
    Ok(Json(policy))
}
