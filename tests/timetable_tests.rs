/// Integration tests for timetable functionality
///
/// This file contains tests for timetable operations:
/// - Creating, listing, updating and deleting entries
/// - Task completion XP
/// - The today view, weekly progress and the statistics report

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

mod common;
use common::*;

const DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Tests creating entries and the weekday ordering of the list
///
/// This test verifies:
/// 1. A POST request to /api/timetable creates an entry
/// 2. Listing orders by weekday and then by time slot
/// 3. The day filter narrows to one weekday
#[tokio::test]
async fn test_create_and_list_in_week_order() {
    // Create our test app
    let mut app = create_test_app();
    let token = register_user(&mut app, "timetable@example.com").await;

    create_timetable_entry(&mut app, &token, "wednesday", "07:00 AM").await;
    create_timetable_entry(&mut app, &token, "monday", "09:00 AM").await;
    let entry = create_timetable_entry(&mut app, &token, "monday", "06:00 AM").await;

    assert_eq!(entry["day"], "monday");
    assert_eq!(entry["time"], "06:00 AM");
    assert_eq!(entry["completed"], false);

    let (status, body) = send_empty(&mut app, "GET", "/api/timetable", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["day"], "monday");
    assert_eq!(entries[0]["time"], "06:00 AM");
    assert_eq!(entries[1]["day"], "monday");
    assert_eq!(entries[1]["time"], "09:00 AM");
    assert_eq!(entries[2]["day"], "wednesday");

    let (_, body) = send_empty(&mut app, "GET", "/api/timetable?day=monday", Some(&token)).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

/// Tests completing a task through a plain update
///
/// This test verifies:
/// 1. A PUT request to /api/timetable/{id} can set completed
/// 2. The first completion awards 10 XP
/// 3. Completing an already-completed task awards nothing
#[tokio::test]
async fn test_completion_awards_xp_once() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "timetable@example.com").await;

    let entry = create_timetable_entry(&mut app, &token, "monday", "06:00 AM").await;
    let uri = format!("/api/timetable/{}", entry["id"].as_str().unwrap());

    let (status, updated) =
        send_json(&mut app, "PUT", &uri, Some(&token), &json!({"completed": true})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(current_xp(&mut app, &token).await, 10);

    send_json(&mut app, "PUT", &uri, Some(&token), &json!({"completed": true})).await;
    assert_eq!(current_xp(&mut app, &token).await, 10);
}

/// Tests the dedicated complete endpoint
///
/// This test verifies:
/// 1. A PUT request to /api/timetable/{id}/complete marks the task done
/// 2. The response is the refreshed entry
/// 3. Repeating the call awards no further XP
#[tokio::test]
async fn test_complete_endpoint_returns_entry() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "timetable@example.com").await;

    let entry = create_timetable_entry(&mut app, &token, "friday", "05:00 PM").await;
    let uri = format!("/api/timetable/{}/complete", entry["id"].as_str().unwrap());

    let (status, body) = send_empty(&mut app, "PUT", &uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], entry["id"]);
    assert_eq!(body["completed"], true);
    assert_eq!(current_xp(&mut app, &token).await, 10);

    let (status, _) = send_empty(&mut app, "PUT", &uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current_xp(&mut app, &token).await, 10);
}

/// Tests editing an entry's slot details
///
/// This test verifies:
/// 1. A PUT request can move an entry to a new subject and time
/// 2. Fields left out of the payload are untouched
#[tokio::test]
async fn test_update_entry_fields() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "timetable@example.com").await;

    let entry = create_timetable_entry(&mut app, &token, "tuesday", "06:00 AM").await;
    let uri = format!("/api/timetable/{}", entry["id"].as_str().unwrap());

    let (status, updated) = send_json(
        &mut app,
        "PUT",
        &uri,
        Some(&token),
        &json!({"subject": "chemistry", "time": "08:00 PM"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["subject"], "chemistry");
    assert_eq!(updated["time"], "08:00 PM");
    assert_eq!(updated["day"], "tuesday");
    assert_eq!(updated["topic"], entry["topic"]);
}

/// Tests deleting an entry
///
/// This test verifies:
/// 1. A DELETE request to /api/timetable/{id} removes the entry
/// 2. Deleting it again reports not found
#[tokio::test]
async fn test_delete_entry() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "timetable@example.com").await;

    let entry = create_timetable_entry(&mut app, &token, "sunday", "10:00 AM").await;
    let uri = format!("/api/timetable/{}", entry["id"].as_str().unwrap());

    let (status, body) = send_empty(&mut app, "DELETE", &uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Timetable entry deleted successfully");

    let (status, body) = send_empty(&mut app, "DELETE", &uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Timetable entry not found");
}

/// Tests the today view
///
/// This test verifies:
/// 1. A GET request to /api/timetable/today returns the current
///    weekday's entries only
#[tokio::test]
async fn test_today_lists_current_weekday() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "today@example.com").await;

    let today = Utc::now().format("%A").to_string().to_lowercase();
    let other = DAYS.iter().find(|day| **day != today).unwrap();

    create_timetable_entry(&mut app, &token, &today, "06:00 AM").await;
    create_timetable_entry(&mut app, &token, other, "06:00 AM").await;

    let (status, body) = send_empty(&mut app, "GET", "/api/timetable/today", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["day"], today.as_str());
}

/// Tests the weekly progress report
///
/// This test verifies:
/// 1. A GET request to /api/timetable/progress/weekly aggregates the week
/// 2. Per-day percentages cover all seven days, empty days at zero
#[tokio::test]
async fn test_weekly_progress_covers_all_days() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "weekly@example.com").await;

    let first = create_timetable_entry(&mut app, &token, "monday", "06:00 AM").await;
    create_timetable_entry(&mut app, &token, "monday", "07:00 AM").await;
    let third = create_timetable_entry(&mut app, &token, "tuesday", "06:00 AM").await;
    create_timetable_entry(&mut app, &token, "wednesday", "06:00 AM").await;
    create_timetable_entry(&mut app, &token, "thursday", "06:00 AM").await;

    for entry in [&first, &third] {
        send_json(
            &mut app,
            "PUT",
            &format!("/api/timetable/{}", entry["id"].as_str().unwrap()),
            Some(&token),
            &json!({"completed": true}),
        )
        .await;
    }

    let (status, body) =
        send_empty(&mut app, "GET", "/api/timetable/progress/weekly", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalTasks"], 5);
    assert_eq!(body["completedTasks"], 2);
    assert_eq!(body["progressPercentage"], 40.0);

    let day_progress = body["dayProgress"].as_object().unwrap();
    assert_eq!(day_progress.len(), 7);
    assert_eq!(day_progress["monday"], 50.0);
    assert_eq!(day_progress["tuesday"], 100.0);
    assert_eq!(day_progress["wednesday"], 0.0);
    assert_eq!(day_progress["sunday"], 0.0);
}

/// Tests the timetable statistics report
///
/// This test verifies:
/// 1. A GET request to /api/timetable/stats breaks the week down
/// 2. Subjects carry completion rates, time slots carry counts
#[tokio::test]
async fn test_timetable_stats_breakdown() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "stats@example.com").await;

    let first = create_timetable_entry(&mut app, &token, "monday", "06:00 AM").await;
    create_timetable_entry(&mut app, &token, "monday", "07:00 AM").await;
    let third = create_timetable_entry(&mut app, &token, "tuesday", "06:00 AM").await;
    create_timetable_entry(&mut app, &token, "wednesday", "06:00 AM").await;
    create_timetable_entry(&mut app, &token, "thursday", "06:00 AM").await;

    for entry in [&first, &third] {
        send_json(
            &mut app,
            "PUT",
            &format!("/api/timetable/{}", entry["id"].as_str().unwrap()),
            Some(&token),
            &json!({"completed": true}),
        )
        .await;
    }

    let (status, body) = send_empty(&mut app, "GET", "/api/timetable/stats", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalEntries"], 5);
    assert_eq!(body["completedEntries"], 2);
    assert_eq!(body["completionRate"], 40.0);

    // Every helper entry studies physics
    assert_eq!(body["subjectDistribution"]["physics"]["total"], 5);
    assert_eq!(body["subjectDistribution"]["physics"]["completed"], 2);
    assert_eq!(body["subjectDistribution"]["physics"]["completionRate"], 40.0);

    assert_eq!(body["timeSlotAnalysis"]["06:00 AM"]["total"], 4);
    assert_eq!(body["timeSlotAnalysis"]["06:00 AM"]["completed"], 2);
    assert_eq!(body["timeSlotAnalysis"]["07:00 AM"]["total"], 1);
}
