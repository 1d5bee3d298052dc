/// Integration tests for mock test functionality
///
/// This file contains tests for test-result operations:
/// - Recording results and the accuracy-tiered XP
/// - Listing and fetching results
/// - Performance analytics and the weak-topic report

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

/// Tests recording a test result via the API
///
/// This test verifies:
/// 1. A POST request to /api/tests stores the result
/// 2. Accuracy is derived from the marks
/// 3. XP is tiered by accuracy, 125 at 90% and 75 at 70%
#[tokio::test]
async fn test_record_result_with_tiered_xp() {
    // Create our test app
    let mut app = create_test_app();
    let token = register_user(&mut app, "tests@example.com").await;

    let result = record_test_result(&mut app, &token, "mains", 270).await;
    assert_eq!(result["accuracy"], 90.0);
    assert_eq!(current_xp(&mut app, &token).await, 125);

    record_test_result(&mut app, &token, "mains", 210).await;
    assert_eq!(current_xp(&mut app, &token).await, 200);
}

/// Tests the stored result's wire format
///
/// This test verifies:
/// 1. The stored result echoes the submitted fields
/// 2. The exam track serializes under the `type` key
/// 3. The subject breakdown and weak topics are preserved
#[tokio::test]
async fn test_stored_result_shape() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "tests@example.com").await;

    let result = record_test_result(&mut app, &token, "mains", 240).await;

    assert!(!result["id"].as_str().unwrap().is_empty());
    assert_eq!(result["type"], "mains");
    assert_eq!(result["score"], 240);
    assert_eq!(result["totalMarks"], 300);
    assert_eq!(result["timeSpent"], 180);
    assert_eq!(result["subjects"]["physics"]["accuracy"], 60.0);
    assert_eq!(result["subjects"]["chemistry"]["score"], 70);
    assert_eq!(
        result["weakTopics"],
        json!(["Rotational Motion", "Thermodynamics"])
    );
    assert!(result.get("date").is_some());
}

/// Tests listing results with a limit and a track filter
///
/// This test verifies:
/// 1. A GET request to /api/tests returns results newest first
/// 2. The limit query caps the list
/// 3. The test_type query filters by exam track
#[tokio::test]
async fn test_list_results_limit_and_filter() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "tests@example.com").await;

    record_test_result(&mut app, &token, "mains", 240).await;
    record_test_result(&mut app, &token, "advanced", 270).await;
    record_test_result(&mut app, &token, "mains", 210).await;

    let (status, body) = send_empty(&mut app, "GET", "/api/tests", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["score"], 210);

    let (_, body) = send_empty(&mut app, "GET", "/api/tests?limit=2", Some(&token)).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send_empty(&mut app, "GET", "/api/tests?test_type=advanced", Some(&token)).await;
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["score"], 270);
}

/// Tests fetching one result by id
///
/// This test verifies:
/// 1. A GET request to /api/tests/{id} returns the stored result
/// 2. An unknown id reports not found
#[tokio::test]
async fn test_get_result_by_id() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "tests@example.com").await;

    let result = record_test_result(&mut app, &token, "advanced", 180).await;
    let result_id = result["id"].as_str().unwrap();

    let (status, fetched) =
        send_empty(&mut app, "GET", &format!("/api/tests/{result_id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], result["id"]);
    assert_eq!(fetched["score"], 180);

    let (status, body) =
        send_empty(&mut app, "GET", "/api/tests/no-such-test", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Test not found");
}

/// Tests the performance analytics report
///
/// This test verifies:
/// 1. A GET request to /api/tests/analytics/performance aggregates scores
/// 2. The trend compares the latest window against the previous one
/// 3. Subject performance and weak-topic counts are included
#[tokio::test]
async fn test_performance_analytics() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "analytics@example.com").await;

    // An empty history reports zeroes
    let (status, body) = send_empty(
        &mut app,
        "GET",
        "/api/tests/analytics/performance",
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalTests"], 0);
    assert_eq!(body["averageScore"], 0.0);
    assert_eq!(body["recentTests"], json!([]));

    record_test_result(&mut app, &token, "mains", 240).await;
    record_test_result(&mut app, &token, "mains", 270).await;

    let (_, body) = send_empty(
        &mut app,
        "GET",
        "/api/tests/analytics/performance",
        Some(&token),
    )
    .await;

    assert_eq!(body["totalTests"], 2);
    assert_eq!(body["averageScore"], 85.0);
    assert_eq!(body["bestScore"], 90.0);
    assert_eq!(body["averageTime"], 180);
    assert_eq!(body["recentTests"].as_array().unwrap().len(), 2);

    // With only two tests the previous window is empty
    assert_eq!(body["trend"]["score"], 85.0);
    assert_eq!(body["trend"]["accuracy"], 85.0);

    assert_eq!(body["subjectPerformance"]["physics"]["average"], 60.0);
    assert_eq!(body["subjectPerformance"]["physics"]["count"], 2);

    let weak = body["weakTopics"].as_array().unwrap();
    assert_eq!(weak.len(), 2);
    assert_eq!(weak[0]["count"], 2);
}

/// Tests the weak-topic report
///
/// This test verifies:
/// 1. A GET request to /api/tests/analytics/weak-topics counts appearances
/// 2. Three appearances push a topic to high priority
/// 3. The test_type filter recomputes over one track only
#[tokio::test]
async fn test_weak_topics_report() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "weak@example.com").await;

    record_test_result(&mut app, &token, "mains", 240).await;
    record_test_result(&mut app, &token, "mains", 210).await;
    record_test_result(&mut app, &token, "advanced", 180).await;

    let (status, body) = send_empty(
        &mut app,
        "GET",
        "/api/tests/analytics/weak-topics",
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalWeakTopics"], 2);
    assert_eq!(body["highPriority"], 2);

    let analysis = body["analysis"].as_array().unwrap();
    assert_eq!(analysis[0]["appearances"], 3);
    assert_eq!(analysis[0]["priority"], "high");
    let tracks = analysis[0]["testTypes"].as_array().unwrap();
    assert!(tracks.contains(&json!("mains")));
    assert!(tracks.contains(&json!("advanced")));

    // Filtered to one track the counts shrink below the thresholds
    let (_, body) = send_empty(
        &mut app,
        "GET",
        "/api/tests/analytics/weak-topics?test_type=advanced",
        Some(&token),
    )
    .await;
    assert_eq!(body["totalWeakTopics"], 2);
    assert_eq!(body["highPriority"], 0);
    assert_eq!(body["analysis"][0]["appearances"], 1);
    assert_eq!(body["analysis"][0]["priority"], "low");
}
