#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    error::ErrorResponse,
    handlers::{
        attendance::{DayRecordsBatchQuery, DayRecordsQuery, StatsQuery},
        employees::EmployeeListQuery,
    },
    models::{
        day_record::{DayKind, DayRecord, Remark},
        employee::Employee,
        policy::{AttendancePolicy, StatusSymbols},
        punch_event::{PunchEvent, PunchInRequest, PunchOutRequest},
        stats::{EmployeeMonthlySummary, MonthlyStats, StatsScope},
        PaginatedResponse,
    },
    services::attendance::{BatchFailure, DayRecordBatch, EmployeeDayRecords},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        punch_in_doc,
        punch_out_doc,
        day_records_doc,
        day_records_batch_doc,
        monthly_stats_doc,
        list_employees_doc,
        effective_policy_doc
    ),
    components(
        schemas(
            PunchInRequest,
            PunchOutRequest,
            PunchEvent,
            DayKind,
            Remark,
            DayRecord,
            DayRecordsQuery,
            DayRecordsBatchQuery,
            DayRecordBatch,
            EmployeeDayRecords,
            BatchFailure,
            StatsQuery,
            StatsScope,
            MonthlyStats,
            EmployeeMonthlySummary,
            Employee,
            EmployeeListQuery,
            AttendancePolicy,
            StatusSymbols,
            ErrorResponse
        )
    ),
    tags(
        (name = "Attendance", description = "Punch sessions, day records and monthly statistics"),
        (name = "Roster", description = "Tracked employees"),
        (name = "Policy", description = "Effective attendance policy")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    post,
    path = "/api/attendance/punch-in",
    request_body = PunchInRequest,
    responses(
        (status = 200, description = "Session opened", body = PunchEvent),
        (status = 404, description = "Unknown employee", body = ErrorResponse),
        (status = 409, description = "Employee already has an open session", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
fn punch_in_doc() {}

#[utoipa::path(
    post,
    path = "/api/attendance/punch-out",
    request_body = PunchOutRequest,
    responses(
        (status = 200, description = "Session closed", body = PunchEvent),
        (status = 400, description = "No open session", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
fn punch_out_doc() {}

#[utoipa::path(
    get,
    path = "/api/attendance/days",
    params(DayRecordsQuery),
    responses(
        (status = 200, description = "One record per calendar day", body = Vec<DayRecord>),
        (status = 400, description = "Invalid window", body = ErrorResponse),
        (status = 404, description = "Unknown employee", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
fn day_records_doc() {}

#[utoipa::path(
    get,
    path = "/api/attendance/days/batch",
    params(DayRecordsBatchQuery),
    responses(
        (status = 200, description = "Day records for a page of the roster", body = DayRecordBatch),
        (status = 400, description = "Invalid window or pagination", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
fn day_records_batch_doc() {}

#[utoipa::path(
    get,
    path = "/api/attendance/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Monthly statistics", body = MonthlyStats),
        (status = 400, description = "Invalid year or month", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
fn monthly_stats_doc() {}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeListQuery),
    responses((status = 200, description = "Tracked employees", body = PaginatedResponse<Employee>)),
    tag = "Roster"
)]
fn list_employees_doc() {}

#[utoipa::path(
    get,
    path = "/api/policy",
    responses((status = 200, description = "Stored policy merged over defaults", body = AttendancePolicy)),
    tag = "Policy"
)]
fn effective_policy_doc() {}
