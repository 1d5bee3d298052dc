use crate::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::RunQueryDsl;
use proptest::prelude::*;
use std::sync::Arc;
use tower::ServiceExt;

use crate::models::{DayOfWeek, Difficulty, Priority};

/// Sets up a test database with migrations applied
///
/// This function:
/// 1. Creates an in-memory SQLite database
/// 2. Enables foreign key constraints
/// 3. Runs all migrations to set up the schema
///
/// ### Returns
///
/// An Arc-wrapped database connection pool connected to the in-memory database
pub fn setup_test_db() -> Arc<db::DbPool> {
    // Use a unique shared in-memory database for each test.
    // Plain ":memory:" gives each connection its own separate database,
    // so migrations run on one connection wouldn't be visible on others.
    // By using a unique URI with cache=shared, all connections in this pool
    // share the same in-memory database while remaining isolated from other tests.
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url);

    // Get a connection from the pool
    let mut conn = pool.get().expect("Failed to get connection");

    // Enable foreign key constraints for SQLite
    conn.batch_execute("PRAGMA foreign_keys = ON").unwrap();

    // Run all migrations to set up the schema
    run_migrations(&mut conn);

    // Wrap the pool in an Arc for thread-safe sharing
    Arc::new(pool)
}

/// Builds an [`AppState`] backed by a fresh test database
pub fn setup_test_state() -> AppState {
    AppState {
        pool: setup_test_db(),
        auth: auth::AuthKeys::new("test-secret"),
    }
}

use diesel::sql_types::Text;
use diesel::QueryableByName;

#[derive(QueryableByName, Debug)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Tests the setup_test_db function
///
/// This test verifies that:
/// 1. The test database can be created and connected to
/// 2. The database has the expected tables
/// 3. The app built on top of it answers requests
#[tokio::test]
async fn test_setup_test_db() {
    let pool = setup_test_db();
    assert!(pool.get().is_ok());

    // Check that all migrations were run, i.e. the tables were created
    let mut conn = pool.get().unwrap();
    let table_names: Vec<TableName> =
        diesel::sql_query("SELECT name FROM sqlite_master WHERE type='table'")
            .load(&mut conn)
            .expect("Failed to load table names");

    assert!(table_names.len() > 0, "No tables found in the database");

    let expected_tables = vec![
        "users",
        "syllabus_items",
        "flashcards",
        "goals",
        "calendar_events",
        "test_results",
        "timetable_entries",
        "__diesel_schema_migrations", // Diesel's migration tracking table
    ];

    for table in expected_tables {
        let exists = table_names.iter().any(|t| t.name == table);
        assert!(exists, "Table '{}' not found in database", table);

        // Test a simple query on each table
        let query = format!("SELECT COUNT(*) FROM {}", table);
        let result = diesel::sql_query(&query).execute(&mut conn);
        assert!(
            result.is_ok(),
            "Failed to query table '{}': {:?}",
            table,
            result.err()
        );
    }

    drop(conn);

    // test interacting with the app
    let app = create_app(AppState {
        pool: pool.clone(),
        auth: auth::AuthKeys::new("test-secret"),
    });

    let request = Request::builder()
        .uri("/api/health")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Response status is not OK (err: {:?})",
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    );
}

/// Generates an arbitrary DateTime<Utc> within 2020-01-01 to 2030-01-01
pub fn arb_datetime_utc() -> impl Strategy<Value = DateTime<Utc>> {
    (1_577_836_800i64..1_893_456_000i64).prop_map(|ts| DateTime::from_timestamp(ts, 0).unwrap())
}

/// Generates an arbitrary difficulty tier
pub fn arb_difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
    ]
}

/// Generates an arbitrary goal priority
pub fn arb_goal_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::High),
        Just(Priority::Medium),
        Just(Priority::Low),
    ]
}

/// Generates an arbitrary day of the week
pub fn arb_day_of_week() -> impl Strategy<Value = DayOfWeek> {
    prop_oneof![
        Just(DayOfWeek::Monday),
        Just(DayOfWeek::Tuesday),
        Just(DayOfWeek::Wednesday),
        Just(DayOfWeek::Thursday),
        Just(DayOfWeek::Friday),
        Just(DayOfWeek::Saturday),
        Just(DayOfWeek::Sunday),
    ]
}

/// Generates a review count in the range a real card could plausibly reach
pub fn arb_review_count() -> impl Strategy<Value = i32> {
    0i32..=200
}

/// Generates a test accuracy percentage in [0.0, 100.0]
///
/// Uses integer-then-divide so the exact boundary values 0.0 and 100.0
/// are reachable without floating point drift.
pub fn arb_accuracy() -> impl Strategy<Value = f64> {
    (0u32..=10_000u32).prop_map(|v| v as f64 / 100.0)
}

/// Generates a non-negative XP total
pub fn arb_xp_total() -> impl Strategy<Value = i32> {
    0i32..=1_000_000
}
