//! Punch-in / punch-out write path.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::punch_event::{PunchEvent, PunchInRequest, PunchOutRequest},
    repositories::{PunchEventRepository, PunchEventRepositoryTrait},
};

#[derive(Clone)]
pub struct PunchService {
    pool: PgPool,
    repo: Arc<dyn PunchEventRepositoryTrait>,
    time_zone: Tz,
}

impl PunchService {
    pub fn new(pool: PgPool, time_zone: Tz) -> Self {
        Self::with_repository(pool, Arc::new(PunchEventRepository::new()), time_zone)
    }

    pub fn with_repository(
        pool: PgPool,
        repo: Arc<dyn PunchEventRepositoryTrait>,
        time_zone: Tz,
    ) -> Self {
        Self {
            pool,
            repo,
            time_zone,
        }
    }

    pub async fn punch_in(&self, request: PunchInRequest) -> Result<PunchEvent, AppError> {
        self.punch_in_at(request, Utc::now()).await
    }

    pub async fn punch_out(&self, request: PunchOutRequest) -> Result<PunchEvent, AppError> {
        self.punch_out_at(request, Utc::now()).await
    }

    /// Opens a session stamped with `now` in the organization timezone.
    pub async fn punch_in_at(
        &self,
        request: PunchInRequest,
        now: DateTime<Utc>,
    ) -> Result<PunchEvent, AppError> {
        request.validate()?;
        let local = now.with_timezone(&self.time_zone).naive_local();
        let event = PunchEvent::open(request.employee_id, local, request.location, now);
        let saved = self.repo.open_session(&self.pool, &event).await?;
        tracing::info!(
            employee_id = %saved.employee_id,
            date = %saved.date,
            "Punch session opened"
        );
        Ok(saved)
    }

    /// Closes the employee's open session, even when it was opened on an earlier date.
    pub async fn punch_out_at(
        &self,
        request: PunchOutRequest,
        now: DateTime<Utc>,
    ) -> Result<PunchEvent, AppError> {
        request.validate()?;
        let local = now.with_timezone(&self.time_zone).naive_local();
        let saved = self
            .repo
            .close_session(&self.pool, request.employee_id, local, request.location, now)
            .await?;
        tracing::info!(
            employee_id = %saved.employee_id,
            date = %saved.date,
            "Punch session closed"
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::punch_event::MockPunchEventRepositoryTrait;
    use crate::types::EmployeeId;
    use chrono::{NaiveDate, TimeZone};
    use mockall::predicate::always;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy("postgres://localhost/test")
            .expect("create lazy pool")
    }

    #[tokio::test]
    async fn punch_in_stamps_local_time_and_date() {
        let mut repo = MockPunchEventRepositoryTrait::new();
        repo.expect_open_session()
            .withf(|_, event| {
                event.punch_out.is_none()
                    && event.date == NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
                    && event.punch_in.format("%H:%M").to_string() == "00:30"
            })
            .times(1)
            .returning(|_, event| Ok(event.clone()));

        let tz: Tz = "Asia/Dhaka".parse().unwrap();
        let service = PunchService::with_repository(lazy_pool(), Arc::new(repo), tz);
        // 18:30 UTC is 00:30 the next day in Dhaka.
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 18, 30, 0).unwrap();
        let event = service
            .punch_in_at(
                PunchInRequest {
                    employee_id: EmployeeId::new(),
                    location: Some("HQ".into()),
                },
                now,
            )
            .await
            .unwrap();

        assert_eq!(event.punch_in_location.as_deref(), Some("HQ"));
    }

    #[tokio::test]
    async fn punch_in_surfaces_conflict_from_repository() {
        let mut repo = MockPunchEventRepositoryTrait::new();
        repo.expect_open_session()
            .returning(|_, _| Err(AppError::Conflict("open session".into())));

        let service = PunchService::with_repository(lazy_pool(), Arc::new(repo), chrono_tz::UTC);
        let err = service
            .punch_in(PunchInRequest {
                employee_id: EmployeeId::new(),
                location: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn punch_in_rejects_long_location_before_store_access() {
        let mut repo = MockPunchEventRepositoryTrait::new();
        repo.expect_open_session().times(0);

        let service = PunchService::with_repository(lazy_pool(), Arc::new(repo), chrono_tz::UTC);
        let err = service
            .punch_in(PunchInRequest {
                employee_id: EmployeeId::new(),
                location: Some("x".repeat(256)),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn punch_out_closes_by_employee_not_by_date() {
        let employee_id = EmployeeId::new();
        let opened = Utc.with_ymd_and_hms(2024, 3, 4, 22, 0, 0).unwrap();
        let mut open_event = PunchEvent::open(employee_id, opened.naive_utc(), None, opened);

        let mut repo = MockPunchEventRepositoryTrait::new();
        repo.expect_close_session()
            .with(
                always(),
                mockall::predicate::eq(employee_id),
                always(),
                mockall::predicate::eq(Some("Gate".to_string())),
                always(),
            )
            .times(1)
            .returning(move |_, _, punch_out, location, now| {
                open_event.punch_out = Some(punch_out);
                open_event.punch_out_location = location;
                open_event.updated_at = now;
                Ok(open_event.clone())
            });

        let service = PunchService::with_repository(lazy_pool(), Arc::new(repo), chrono_tz::UTC);
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 6, 0, 0).unwrap();
        let event = service
            .punch_out_at(
                PunchOutRequest {
                    employee_id,
                    location: Some("Gate".into()),
                },
                now,
            )
            .await
            .unwrap();

        assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(event.completed_minutes(), Some(480));
    }

    #[tokio::test]
    async fn punch_out_without_open_session_is_bad_request() {
        let mut repo = MockPunchEventRepositoryTrait::new();
        repo.expect_close_session()
            .returning(|_, _, _, _, _| Err(AppError::BadRequest("No open punch session".into())));

        let service = PunchService::with_repository(lazy_pool(), Arc::new(repo), chrono_tz::UTC);
        let err = service
            .punch_out(PunchOutRequest {
                employee_id: EmployeeId::new(),
                location: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
