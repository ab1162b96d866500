//! Attendance read service: loads sources through an injectable loader and runs the engine.

use std::{
    collections::BTreeSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{
        day_record::DayRecord,
        employee::{Employee, RosterFilter},
        holiday::Holiday,
        leave::LeaveRecord,
        policy::AttendancePolicy,
        punch_event::PunchEvent,
        stats::{MonthlyStats, StatsScope},
        Page, PaginatedResponse,
    },
    repositories::{
        EmployeeRepository, HolidayRepository, LeaveRecordRepository, PolicyRepository,
        PunchEventRepository, PunchEventRepositoryTrait,
    },
    services::{
        calendar::{month_window, DateRange},
        classifier::build_day_records,
        statistics::{compute_monthly_stats, StatsInput},
    },
    types::EmployeeId,
};

/// Everything the engine needs for one window and scope.
#[derive(Debug, Clone, Default)]
pub struct AttendanceSources {
    pub policy: AttendancePolicy,
    /// Employees in scope; the single employee, or every tracked employee.
    pub employees: Vec<EmployeeId>,
    pub holidays: Vec<Holiday>,
    pub leaves: Vec<LeaveRecord>,
    pub punches: Vec<PunchEvent>,
}

/// Per-employee part of the sources: who is in scope and what they did.
#[derive(Debug, Clone, Default)]
pub struct EmployeeActivity {
    pub employees: Vec<EmployeeId>,
    pub leaves: Vec<LeaveRecord>,
    pub punches: Vec<PunchEvent>,
}

/// Source of policy, calendar, leave, punch and roster data.
#[async_trait]
pub trait SourceLoader: Send + Sync {
    async fn policy(&self) -> Result<AttendancePolicy, AppError>;

    async fn holidays(&self, range: DateRange) -> Result<Vec<Holiday>, AppError>;

    /// Leave and punches intersecting `range`; `None` loads every tracked employee.
    async fn activity(
        &self,
        employee_id: Option<EmployeeId>,
        range: DateRange,
    ) -> Result<EmployeeActivity, AppError>;

    async fn roster(&self, filter: &RosterFilter) -> Result<(Vec<Employee>, i64), AppError>;

    async fn sources(
        &self,
        employee_id: Option<EmployeeId>,
        range: DateRange,
    ) -> Result<AttendanceSources, AppError> {
        let activity = self.activity(employee_id, range).await?;
        let policy = self.policy().await?;
        let holidays = self.holidays(range).await?;
        Ok(AttendanceSources {
            policy,
            employees: activity.employees,
            holidays,
            leaves: activity.leaves,
            punches: activity.punches,
        })
    }
}

#[derive(Clone)]
pub struct PgSourceLoader {
    pool: PgPool,
}

impl PgSourceLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SourceLoader for PgSourceLoader {
    async fn policy(&self) -> Result<AttendancePolicy, AppError> {
        let row = PolicyRepository::new().fetch(&self.pool).await?;
        Ok(AttendancePolicy::from_stored(row))
    }

    async fn holidays(&self, range: DateRange) -> Result<Vec<Holiday>, AppError> {
        HolidayRepository::new()
            .find_overlapping(&self.pool, range.start(), range.end())
            .await
    }

    async fn activity(
        &self,
        employee_id: Option<EmployeeId>,
        range: DateRange,
    ) -> Result<EmployeeActivity, AppError> {
        let employees = match employee_id {
            Some(id) => vec![EmployeeRepository::new().find_by_id(&self.pool, id).await?.id],
            None => EmployeeRepository::new().tracked_ids(&self.pool).await?,
        };
        let leaves = LeaveRecordRepository::new()
            .find_overlapping(&self.pool, employee_id, range.start(), range.end())
            .await?;
        let punches = PunchEventRepository::new()
            .find_in_range(&self.pool, employee_id, range.start(), range.end())
            .await?;

        Ok(EmployeeActivity {
            employees,
            leaves,
            punches,
        })
    }

    async fn roster(&self, filter: &RosterFilter) -> Result<(Vec<Employee>, i64), AppError> {
        EmployeeRepository::new().search_tracked(&self.pool, filter).await
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeDayRecords {
    pub employee: Employee,
    pub records: Vec<DayRecord>,
}

/// An employee whose records could not be produced; the message is safe for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BatchFailure {
    pub employee_id: EmployeeId,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DayRecordBatch {
    pub data: Vec<EmployeeDayRecords>,
    pub failures: Vec<BatchFailure>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait AttendanceServiceTrait: Send + Sync {
    /// Stored policy merged over the defaults.
    async fn policy(&self) -> Result<AttendancePolicy, AppError>;

    /// One record per calendar day of `range`.
    async fn day_records(
        &self,
        employee_id: EmployeeId,
        range: DateRange,
        today: NaiveDate,
    ) -> Result<Vec<DayRecord>, AppError>;

    /// Day records for a page of the tracked roster; per-employee failures are reported, not raised.
    async fn day_records_batch(
        &self,
        filter: RosterFilter,
        range: DateRange,
        today: NaiveDate,
    ) -> Result<DayRecordBatch, AppError>;

    async fn monthly_stats(
        &self,
        scope: StatsScope,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Result<MonthlyStats, AppError>;

    async fn roster(&self, filter: RosterFilter) -> Result<PaginatedResponse<Employee>, AppError>;
}

#[derive(Clone)]
pub struct AttendanceService {
    loader: Arc<dyn SourceLoader>,
    batch_concurrency: usize,
}

impl AttendanceService {
    pub fn new(pool: PgPool, batch_concurrency: usize) -> Self {
        Self::with_loader(Arc::new(PgSourceLoader::new(pool)), batch_concurrency)
    }

    pub fn with_loader(loader: Arc<dyn SourceLoader>, batch_concurrency: usize) -> Self {
        Self {
            loader,
            batch_concurrency: batch_concurrency.max(1),
        }
    }
}

#[async_trait]
impl AttendanceServiceTrait for AttendanceService {
    async fn policy(&self) -> Result<AttendancePolicy, AppError> {
        self.loader.policy().await
    }

    async fn day_records(
        &self,
        employee_id: EmployeeId,
        range: DateRange,
        today: NaiveDate,
    ) -> Result<Vec<DayRecord>, AppError> {
        let sources = self.loader.sources(Some(employee_id), range).await?;
        Ok(build_day_records(
            employee_id,
            range,
            today,
            &sources.policy,
            &sources.holidays,
            &sources.leaves,
            &sources.punches,
        ))
    }

    async fn day_records_batch(
        &self,
        filter: RosterFilter,
        range: DateRange,
        today: NaiveDate,
    ) -> Result<DayRecordBatch, AppError> {
        let (employees, total) = self.loader.roster(&filter).await?;
        let policy = self.loader.policy().await?;
        let holidays = self.loader.holidays(range).await?;
        let (policy, holidays) = (&policy, &holidays);

        let outcomes: Vec<(Employee, Result<Vec<DayRecord>, AppError>)> =
            stream::iter(employees.into_iter().map(|employee| async move {
                let records = self
                    .loader
                    .activity(Some(employee.id), range)
                    .await
                    .map(|activity| {
                        build_day_records(
                            employee.id,
                            range,
                            today,
                            policy,
                            holidays,
                            &activity.leaves,
                            &activity.punches,
                        )
                    });
                (employee, records)
            }))
            .buffered(self.batch_concurrency)
            .collect()
            .await;

        let mut data = Vec::new();
        let mut failures = Vec::new();
        for (employee, outcome) in outcomes {
            match outcome {
                Ok(records) => data.push(EmployeeDayRecords { employee, records }),
                Err(err) => {
                    tracing::error!(
                        employee_id = %employee.id,
                        error = ?err,
                        "Failed to build day records for employee"
                    );
                    failures.push(BatchFailure {
                        employee_id: employee.id,
                        error: err.public_message(),
                    });
                }
            }
        }

        Ok(DayRecordBatch {
            data,
            failures,
            total,
            limit: filter.limit,
            offset: filter.offset,
        })
    }

    async fn monthly_stats(
        &self,
        scope: StatsScope,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Result<MonthlyStats, AppError> {
        let range = month_window(year, month, today)?;
        let month_range = DateRange::month(year, month)?;
        let employee_id = match scope {
            StatsScope::Employee { employee_id } => Some(employee_id),
            StatsScope::Organization => None,
        };
        let sources = self.loader.sources(employee_id, month_range).await?;

        Ok(compute_monthly_stats(&StatsInput {
            scope,
            year,
            month,
            range,
            month_range,
            employees: &sources.employees,
            policy: &sources.policy,
            holidays: &sources.holidays,
            leaves: &sources.leaves,
            punches: &sources.punches,
        }))
    }

    async fn roster(&self, filter: RosterFilter) -> Result<PaginatedResponse<Employee>, AppError> {
        let (employees, total) = self.loader.roster(&filter).await?;
        let page = Page {
            limit: filter.limit,
            offset: filter.offset,
        };
        Ok(PaginatedResponse::new(employees, total, page))
    }
}

/// How often the stub served shared sources.
#[derive(Debug, Default)]
pub struct LoadCounts {
    policy: AtomicUsize,
    holidays: AtomicUsize,
}

impl LoadCounts {
    pub fn policy(&self) -> usize {
        self.policy.load(Ordering::SeqCst)
    }

    pub fn holidays(&self) -> usize {
        self.holidays.load(Ordering::SeqCst)
    }
}

/// In-memory sources for tests and local tooling.
#[derive(Debug, Clone, Default)]
pub struct AttendanceServiceStub {
    policy: AttendancePolicy,
    employees: Vec<Employee>,
    holidays: Vec<Holiday>,
    leaves: Vec<LeaveRecord>,
    punches: Vec<PunchEvent>,
    failing: BTreeSet<EmployeeId>,
    loads: Arc<LoadCounts>,
}

impl AttendanceServiceStub {
    pub fn new(policy: AttendancePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.employees.push(employee);
        self
    }

    pub fn with_holiday(mut self, holiday: Holiday) -> Self {
        self.holidays.push(holiday);
        self
    }

    pub fn with_leave(mut self, leave: LeaveRecord) -> Self {
        self.leaves.push(leave);
        self
    }

    pub fn with_punch(mut self, punch: PunchEvent) -> Self {
        self.punches.push(punch);
        self
    }

    /// Make every activity load for `employee_id` fail with an internal error.
    pub fn with_failing_employee(mut self, employee_id: EmployeeId) -> Self {
        self.failing.insert(employee_id);
        self
    }

    pub fn load_counts(&self) -> Arc<LoadCounts> {
        Arc::clone(&self.loads)
    }

    pub fn service(self) -> AttendanceService {
        AttendanceService::with_loader(Arc::new(self), 4)
    }

    fn tracked(&self) -> Vec<&Employee> {
        let mut tracked: Vec<&Employee> = self.employees.iter().filter(|e| e.is_tracked).collect();
        tracked.sort_by(|a, b| (&a.display_name, a.id).cmp(&(&b.display_name, b.id)));
        tracked
    }
}

#[async_trait]
impl SourceLoader for AttendanceServiceStub {
    async fn policy(&self) -> Result<AttendancePolicy, AppError> {
        self.loads.policy.fetch_add(1, Ordering::SeqCst);
        Ok(self.policy.clone())
    }

    async fn holidays(&self, range: DateRange) -> Result<Vec<Holiday>, AppError> {
        self.loads.holidays.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .holidays
            .iter()
            .filter(|h| h.from_date <= range.end() && h.to_date >= range.start())
            .cloned()
            .collect())
    }

    async fn activity(
        &self,
        employee_id: Option<EmployeeId>,
        range: DateRange,
    ) -> Result<EmployeeActivity, AppError> {
        let employees = match employee_id {
            Some(id) => {
                if self.failing.contains(&id) {
                    return Err(AppError::InternalServerError(anyhow::anyhow!(
                        "source load failed for employee {}",
                        id
                    )));
                }
                if !self.employees.iter().any(|e| e.id == id) {
                    return Err(AppError::NotFound("Employee not found".into()));
                }
                vec![id]
            }
            None => self.tracked().into_iter().map(|e| e.id).collect(),
        };
        let in_scope = |id: EmployeeId| employee_id.map_or(true, |wanted| wanted == id);

        Ok(EmployeeActivity {
            employees,
            leaves: self
                .leaves
                .iter()
                .filter(|l| in_scope(l.employee_id))
                .filter(|l| l.from_date <= range.end() && l.to_date >= range.start())
                .cloned()
                .collect(),
            punches: self
                .punches
                .iter()
                .filter(|p| in_scope(p.employee_id) && range.contains(p.date))
                .cloned()
                .collect(),
        })
    }

    async fn roster(&self, filter: &RosterFilter) -> Result<(Vec<Employee>, i64), AppError> {
        let matching: Vec<&Employee> = self
            .tracked()
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }
}
