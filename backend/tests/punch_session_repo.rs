use chrono::Utc;
use rollcall_backend::{
    error::AppError,
    models::{employee::Employee, employee::RosterFilter, punch_event::PunchEvent},
    repositories::{EmployeeRepository, PunchEventRepository, PunchEventRepositoryTrait},
};
use sqlx::PgPool;

mod support;
use support::{at, date, test_pool};

async fn insert_employee(pool: &PgPool, name: &str) -> Employee {
    let employee = Employee::new(name);
    sqlx::query("INSERT INTO employees (id, display_name, is_tracked, created_at) VALUES ($1, $2, $3, $4)")
        .bind(employee.id)
        .bind(&employee.display_name)
        .bind(employee.is_tracked)
        .bind(employee.created_at)
        .execute(pool)
        .await
        .expect("insert employee");
    employee
}

#[tokio::test]
async fn second_open_session_conflicts() {
    let pool = test_pool().await;
    let employee = insert_employee(&pool, "Open Twice").await;
    let repo = PunchEventRepository::new();

    let first = PunchEvent::open(employee.id, at(date(2024, 3, 4), "09:00"), None, Utc::now());
    repo.open_session(&pool, &first).await.expect("first open");

    let second = PunchEvent::open(employee.id, at(date(2024, 3, 4), "09:05"), None, Utc::now());
    let err = repo.open_session(&pool, &second).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn concurrent_punch_ins_open_exactly_one_session() {
    let pool = test_pool().await;
    let employee = insert_employee(&pool, "Double Tap").await;
    let repo = PunchEventRepository::new();

    let first = PunchEvent::open(employee.id, at(date(2024, 3, 4), "09:00"), None, Utc::now());
    let second = PunchEvent::open(employee.id, at(date(2024, 3, 4), "09:00"), None, Utc::now());
    let (a, b) = tokio::join!(
        repo.open_session(&pool, &first),
        repo.open_session(&pool, &second)
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|r| matches!(r, Err(AppError::Conflict(_))))
            .count(),
        1
    );

    let open_rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM punch_events WHERE employee_id = $1 AND punch_out IS NULL",
    )
    .bind(employee.id)
    .fetch_one(&pool)
    .await
    .expect("count open sessions");
    assert_eq!(open_rows, 1);
}

#[tokio::test]
async fn close_session_finds_overnight_session() {
    let pool = test_pool().await;
    let employee = insert_employee(&pool, "Night Shift").await;
    let repo = PunchEventRepository::new();

    let open = PunchEvent::open(employee.id, at(date(2024, 3, 4), "22:00"), None, Utc::now());
    repo.open_session(&pool, &open).await.expect("open");

    let closed = repo
        .close_session(
            &pool,
            employee.id,
            at(date(2024, 3, 5), "06:00"),
            Some("Gate".into()),
            Utc::now(),
        )
        .await
        .expect("close");
    assert_eq!(closed.id, open.id);
    assert_eq!(closed.date, date(2024, 3, 4));
    assert_eq!(closed.completed_minutes(), Some(480));

    let err = repo
        .close_session(&pool, employee.id, at(date(2024, 3, 5), "07:00"), None, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let events = repo
        .find_in_range(&pool, Some(employee.id), date(2024, 3, 4), date(2024, 3, 4))
        .await
        .expect("range read");
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn open_session_for_unknown_employee_is_not_found() {
    let pool = test_pool().await;
    let repo = PunchEventRepository::new();
    let stranger = Employee::new("Nobody");

    let event = PunchEvent::open(stranger.id, at(date(2024, 3, 4), "09:00"), None, Utc::now());
    let err = repo.open_session(&pool, &event).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn roster_search_is_case_insensitive_and_paginated() {
    let pool = test_pool().await;
    let marker = uuid::Uuid::new_v4().simple().to_string();
    insert_employee(&pool, &format!("Zed {}", marker)).await;
    insert_employee(&pool, &format!("zoe {}", marker)).await;

    let repo = EmployeeRepository::new();
    let filter = RosterFilter::new(Some(marker.to_uppercase()), 1, 0);
    let (rows, total) = repo.search_tracked(&pool, &filter).await.expect("search");
    assert_eq!(total, 2);
    assert_eq!(rows.len(), 1);
}
