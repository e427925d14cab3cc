#![allow(dead_code)]

use attendance_api::entities::{
    attendance::{self, AttendanceStatus, WorkMode},
    shift,
    time_zone,
    user::{self, Role},
};
use attendance_api::{AppState, QueryConfig, migration::Migrator, router};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const EMPLOYEE_TOKEN: &str = "employee-token";

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    setup_test_app_with(db, QueryConfig::default())
}

pub fn setup_test_app_with(db: DatabaseConnection, config: QueryConfig) -> Router {
    router(AppState::new(db, config))
}

/// `2024-01-01T00:00:00Z` plus `days`.
pub fn day(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(days)
}

pub async fn insert_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    role: Role,
    token: Option<&str>,
    created_at: DateTime<Utc>,
) -> user::Model {
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        role: Set(role),
        token: Set(token.map(str::to_string)),
        is_active: Set(true),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(db)
    .await
    .expect("Failed to insert user")
}

/// An admin and an employee holding [`ADMIN_TOKEN`] and [`EMPLOYEE_TOKEN`].
pub async fn seed_users(db: &DatabaseConnection) -> (user::Model, user::Model) {
    let admin = insert_user(db, "Ada Admin", "ada@example.com", Role::Admin, Some(ADMIN_TOKEN), day(0)).await;
    let employee = insert_user(
        db,
        "John Worker",
        "john@example.com",
        Role::Employee,
        Some(EMPLOYEE_TOKEN),
        day(1),
    )
    .await;
    (admin, employee)
}

pub async fn insert_shift(
    db: &DatabaseConnection,
    name: &str,
    is_active: bool,
    created_at: DateTime<Utc>,
) -> shift::Model {
    shift::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        clock_in: Set("08:00".to_string()),
        clock_out: Set("17:00".to_string()),
        is_active: Set(is_active),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(db)
    .await
    .expect("Failed to insert shift")
}

pub async fn insert_time_zone(
    db: &DatabaseConnection,
    name: &str,
    name_code: &str,
    time_code: &str,
    timezone: &str,
) -> time_zone::Model {
    time_zone::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        name_code: Set(name_code.to_string()),
        time_code: Set(time_code.to_string()),
        timezone: Set(timezone.to_string()),
        created_at: Set(day(0)),
        updated_at: Set(day(0)),
    }
    .insert(db)
    .await
    .expect("Failed to insert time zone")
}

pub async fn insert_attendance(
    db: &DatabaseConnection,
    user_id: Uuid,
    status: AttendanceStatus,
    notes: Option<&str>,
    created_at: DateTime<Utc>,
) -> attendance::Model {
    attendance::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        check_in: Set(Some(created_at)),
        check_out: Set(None),
        work_mode: Set(WorkMode::Office),
        status: Set(status),
        notes: Set(notes.map(str::to_string)),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(db)
    .await
    .expect("Failed to insert attendance")
}

/// Percent-encode a JSON blob for use as a query value.
pub fn encode(json: &str) -> String {
    url_escape::encode_component(json).to_string()
}

/// Send a request and decode the JSON envelope.
pub async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {token}"));
    }
    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, Some(token)).await
}

/// Values of `field` across `content.entries`.
pub fn entry_values(body: &Value, field: &str) -> Vec<Value> {
    body["content"]["entries"]
        .as_array()
        .map(|entries| entries.iter().map(|e| e[field].clone()).collect())
        .unwrap_or_default()
}
