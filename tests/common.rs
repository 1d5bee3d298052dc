/// Common test utilities for Abhyasa integration tests
///
/// This file contains shared functions and utilities for all integration
/// tests: test application setup, request helpers that speak the API's
/// JSON dialect, and helpers for registering users and creating common
/// test records.

use abhyasa::{auth::AuthKeys, create_app, db::init_pool, run_migrations, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service;
use uuid::Uuid;

/// Creates a test application with an in-memory SQLite database
///
/// Each call uses a uniquely named shared-cache in-memory database, so
/// every connection in the pool sees the same schema while separate
/// tests stay isolated from each other.
///
/// ### Returns
///
/// An Axum Router configured with all routes and connected to an
/// in-memory database
pub fn create_test_app() -> Router {
    let database_url = format!("file:itest_{}?mode=memory&cache=shared", Uuid::new_v4());
    let pool = Arc::new(init_pool(&database_url));

    // Run migrations on the in-memory database to set up the schema
    {
        let conn = &mut pool.get().unwrap();
        run_migrations(conn);
    }

    create_app(AppState {
        pool,
        auth: AuthKeys::new("integration-test-secret"),
    })
}

/// Sends a request with a JSON body and parses the JSON response
///
/// ### Arguments
///
/// * `app` - The test application
/// * `method` - The HTTP method to use
/// * `uri` - The request URI
/// * `token` - An optional bearer token
/// * `body` - The JSON request body
///
/// ### Returns
///
/// The response status and parsed JSON body
pub async fn send_json(
    app: &mut Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();

    (status, value)
}

/// Sends a bodyless request and parses the JSON response
///
/// ### Arguments
///
/// * `app` - The test application
/// * `method` - The HTTP method to use
/// * `uri` - The request URI
/// * `token` - An optional bearer token
///
/// ### Returns
///
/// The response status and parsed JSON body
pub async fn send_empty(
    app: &mut Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = app.call(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();

    (status, value)
}

/// Registers a user via the API and returns their bearer token
///
/// This helper:
/// 1. Sends a POST request to /api/auth/register
/// 2. Verifies the response has a 200 OK status
/// 3. Extracts and returns the access token
///
/// ### Arguments
///
/// * `app` - The test application
/// * `email` - The email for the new account
///
/// ### Returns
///
/// The bearer token for the new user
pub async fn register_user(app: &mut Router, email: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/auth/register",
        None,
        &json!({
            "email": email,
            "password": "a-strong-password",
            "name": "Test User"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["access_token"].as_str().unwrap().to_string()
}

/// Creates a flashcard via the API
///
/// ### Arguments
///
/// * `app` - The test application
/// * `token` - The user's bearer token
/// * `subject` - The card's subject
/// * `difficulty` - The review difficulty tier
///
/// ### Returns
///
/// The created flashcard as JSON
pub async fn create_flashcard(
    app: &mut Router,
    token: &str,
    subject: &str,
    difficulty: &str,
) -> Value {
    let (status, card) = send_json(
        app,
        "POST",
        "/api/flashcards",
        Some(token),
        &json!({
            "subject": subject,
            "topic": "Kinematics",
            "question": "Define average velocity.",
            "answer": "Displacement divided by elapsed time.",
            "difficulty": difficulty
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    card
}

/// Creates a goal via the API with a deadline the given number of days
/// from today
///
/// ### Arguments
///
/// * `app` - The test application
/// * `token` - The user's bearer token
/// * `title` - The goal title
/// * `days_ahead` - How many days from today the deadline falls
///
/// ### Returns
///
/// The created goal as JSON
pub async fn create_goal(app: &mut Router, token: &str, title: &str, days_ahead: i64) -> Value {
    let deadline = (chrono::Utc::now().date_naive() + chrono::Duration::days(days_ahead)).to_string();
    let (status, goal) = send_json(
        app,
        "POST",
        "/api/goals",
        Some(token),
        &json!({
            "title": title,
            "description": "Integration test goal",
            "deadline": deadline,
            "priority": "high",
            "category": "syllabus"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    goal
}

/// Creates a timetable entry via the API
///
/// ### Arguments
///
/// * `app` - The test application
/// * `token` - The user's bearer token
/// * `day` - The lowercase weekday name
/// * `time` - The time slot label
///
/// ### Returns
///
/// The created timetable entry as JSON
pub async fn create_timetable_entry(
    app: &mut Router,
    token: &str,
    day: &str,
    time: &str,
) -> Value {
    let (status, entry) = send_json(
        app,
        "POST",
        "/api/timetable",
        Some(token),
        &json!({
            "day": day,
            "time": time,
            "subject": "physics",
            "topic": "Rotational Motion"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    entry
}

/// Records a mock test result via the API
///
/// The subject map and weak topics are fixed; only the track and score
/// vary per test.
///
/// ### Arguments
///
/// * `app` - The test application
/// * `token` - The user's bearer token
/// * `exam_type` - The exam track ("mains" or "advanced")
/// * `score` - The score out of 300
///
/// ### Returns
///
/// The stored test result as JSON
pub async fn record_test_result(
    app: &mut Router,
    token: &str,
    exam_type: &str,
    score: i64,
) -> Value {
    let (status, result) = send_json(
        app,
        "POST",
        "/api/tests",
        Some(token),
        &json!({
            "type": exam_type,
            "score": score,
            "totalMarks": 300,
            "timeSpent": 180,
            "subjects": {
                "physics": {"score": 60, "total": 100, "accuracy": 60.0},
                "chemistry": {"score": 70, "total": 100, "accuracy": 70.0}
            },
            "weakTopics": ["Rotational Motion", "Thermodynamics"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    result
}

/// Reads the user's current XP total via the stats endpoint
pub async fn current_xp(app: &mut Router, token: &str) -> i64 {
    let (status, stats) = send_empty(app, "GET", "/api/user/stats", Some(token)).await;
    assert_eq!(status, StatusCode::OK);

    stats["totalXP"].as_i64().unwrap()
}
