/// Integration tests for user statistics and gamification
///
/// This file contains tests for the user endpoints:
/// - Reading and overwriting aggregated statistics
/// - Granting XP and tracking level crossings
/// - Awarding badges
/// - The level progress report

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

/// Tests the statistics snapshot of a fresh account
///
/// This test verifies:
/// 1. A GET request to /api/user/stats returns the aggregated snapshot
/// 2. Every counter starts at zero
/// 3. The topic totals come from the seeded syllabus
#[tokio::test]
async fn test_fresh_user_stats_snapshot() {
    // Create our test app
    let mut app = create_test_app();
    let token = register_user(&mut app, "stats@example.com").await;

    let (status, body) = send_empty(&mut app, "GET", "/api/user/stats", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalXP"], 0);
    assert_eq!(body["currentStreak"], 0);
    assert_eq!(body["longestStreak"], 0);
    assert_eq!(body["totalStudyHours"], 0);
    assert_eq!(body["completedTopics"], 0);
    assert_eq!(body["totalTopics"], 20);
    assert_eq!(body["badges"], json!([]));
}

/// Tests overwriting the XP total through the stats endpoint
///
/// This test verifies:
/// 1. A PUT request to /api/user/stats replaces the XP total
/// 2. The level is rederived from the new total
#[tokio::test]
async fn test_update_stats_rederives_level() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "stats@example.com").await;

    let (status, body) = send_json(
        &mut app,
        "PUT",
        "/api/user/stats",
        Some(&token),
        &json!({"totalXP": 1200}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Stats updated successfully");

    // 1200 XP sits 200 into the level 3 band
    let (status, level) = send_empty(&mut app, "GET", "/api/user/level", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(level["currentLevel"], 3);
    assert_eq!(level["totalXP"], 1200);
    assert_eq!(level["xpForCurrentLevel"], 1000);
    assert_eq!(level["xpForNextLevel"], 1500);
    assert_eq!(level["xpProgressInLevel"], 200);
    assert_eq!(level["xpNeededForNext"], 300);
    assert_eq!(level["progressPercentage"], 40.0);
}

/// Tests that an empty stats update is accepted without changes
///
/// This test verifies:
/// 1. A PUT request with an empty payload still succeeds
/// 2. The stored statistics are untouched
#[tokio::test]
async fn test_update_stats_empty_payload_is_accepted() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "stats@example.com").await;

    let (status, body) =
        send_json(&mut app, "PUT", "/api/user/stats", Some(&token), &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Stats updated successfully");

    let (_, stats) = send_empty(&mut app, "GET", "/api/user/stats", Some(&token)).await;
    assert_eq!(stats["totalXP"], 0);
}

/// Tests that raising the current streak drags the longest streak along
///
/// This test verifies:
/// 1. Setting a current streak above the longest raises both
/// 2. Lowering the current streak afterwards leaves the longest intact
#[tokio::test]
async fn test_update_stats_tracks_longest_streak() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "streak@example.com").await;

    send_json(
        &mut app,
        "PUT",
        "/api/user/stats",
        Some(&token),
        &json!({"currentStreak": 9}),
    )
    .await;

    let (_, stats) = send_empty(&mut app, "GET", "/api/user/stats", Some(&token)).await;
    assert_eq!(stats["currentStreak"], 9);
    assert_eq!(stats["longestStreak"], 9);

    // A broken streak does not shrink the record
    send_json(
        &mut app,
        "PUT",
        "/api/user/stats",
        Some(&token),
        &json!({"currentStreak": 2}),
    )
    .await;

    let (_, stats) = send_empty(&mut app, "GET", "/api/user/stats", Some(&token)).await;
    assert_eq!(stats["currentStreak"], 2);
    assert_eq!(stats["longestStreak"], 9);
}

/// Tests granting XP directly
///
/// This test verifies:
/// 1. A POST request to /api/user/xp adds to the total
/// 2. Crossing a 500-XP boundary is reported as a level up
/// 3. The reason defaults when not supplied
#[tokio::test]
async fn test_add_xp_reports_level_crossing() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "xp@example.com").await;

    let (status, body) = send_json(
        &mut app,
        "POST",
        "/api/user/xp",
        Some(&token),
        &json!({"amount": 520, "reason": "Mock test marathon"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Added 520 XP");
    assert_eq!(body["reason"], "Mock test marathon");
    assert_eq!(body["newTotalXP"], 520);
    assert_eq!(body["newLevel"], 2);
    assert_eq!(body["leveledUp"], true);

    // A small grant inside the band does not level up
    let (_, body) = send_json(
        &mut app,
        "POST",
        "/api/user/xp",
        Some(&token),
        &json!({"amount": 10}),
    )
    .await;
    assert_eq!(body["reason"], "Study activity");
    assert_eq!(body["newTotalXP"], 530);
    assert_eq!(body["newLevel"], 2);
    assert_eq!(body["leveledUp"], false);
}

/// Tests awarding badges by name
///
/// This test verifies:
/// 1. A POST request to /api/user/badges/{name} awards the badge
/// 2. Repeating the award reports it as already earned
/// 3. The badge list reflects the award exactly once
#[tokio::test]
async fn test_award_badge_is_idempotent() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "badges@example.com").await;

    let (status, body) =
        send_empty(&mut app, "POST", "/api/user/badges/early-bird", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Badge 'early-bird' awarded successfully");

    let (status, body) =
        send_empty(&mut app, "POST", "/api/user/badges/early-bird", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Badge 'early-bird' already earned");

    let (_, body) = send_empty(&mut app, "GET", "/api/user/badges", Some(&token)).await;
    assert_eq!(body["badges"], json!(["early-bird"]));
}

/// Tests that the stats snapshot expands badges into entries
///
/// This test verifies:
/// 1. Earned badges appear in the stats response
/// 2. Each entry carries an id, a name, and an earned date
#[tokio::test]
async fn test_stats_expand_badges() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "badges@example.com").await;

    send_empty(&mut app, "POST", "/api/user/badges/night-owl", Some(&token)).await;

    let (_, stats) = send_empty(&mut app, "GET", "/api/user/stats", Some(&token)).await;
    let badges = stats["badges"].as_array().unwrap();
    assert_eq!(badges.len(), 1);
    assert_eq!(badges[0]["id"], "night-owl");
    assert_eq!(badges[0]["name"], "night-owl");
    assert_eq!(badges[0]["earned"], true);
    // YYYY-MM-DD
    assert_eq!(badges[0]["earnedDate"].as_str().unwrap().len(), 10);
}

/// Tests the level report of a fresh account
///
/// This test verifies:
/// 1. A GET request to /api/user/level returns the first band
/// 2. The whole band is still ahead
#[tokio::test]
async fn test_level_report_for_fresh_user() {
    let mut app = create_test_app();
    let token = register_user(&mut app, "level@example.com").await;

    let (status, level) = send_empty(&mut app, "GET", "/api/user/level", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(level["currentLevel"], 1);
    assert_eq!(level["totalXP"], 0);
    assert_eq!(level["xpForCurrentLevel"], 0);
    assert_eq!(level["xpForNextLevel"], 500);
    assert_eq!(level["xpNeededForNext"], 500);
    assert_eq!(level["progressPercentage"], 0.0);
}
