/// Abhyasa: A Study Tracking Library for Exam Preparation
///
/// This library provides the core functionality for an exam preparation
/// tracker, including data models, database access, and a web API covering
/// flashcards with spaced repetition, syllabus progress, goals, mock test
/// analytics, timetables and an XP-based leveling system.
///
/// The name "Abhyasa" is the Sanskrit word for persistent, disciplined
/// practice, which is what the tracker is meant to encourage.
///
/// ### Modules
///
/// - `auth`: Password hashing and bearer token issuing/validation
/// - `config`: Layered configuration (defaults, TOML file, CLI/env)
/// - `db`: Database connection management
/// - `dto`: Request and query-string payload types
/// - `errors`: The API error type and its HTTP mapping
/// - `handlers`: Axum request handlers, one submodule per resource
/// - `models`: Data structures representing users, cards, goals and the rest
/// - `progress`: Pure aggregation functions behind the stats endpoints
/// - `repo`: Repository layer for database operations
/// - `scheduler`: Spaced-repetition interval calculation
/// - `schema`: Database schema definitions
/// - `seed`: The default syllabus and the motivational quote list
/// - `xp`: XP awards and level arithmetic
///
/// ### Web API
///
/// The library exposes a RESTful API using Axum under the `/api` prefix.
/// Registering or logging in yields a bearer token; every route outside
/// `/api/`, `/api/health`, `/api/quote` and the two auth entry points
/// requires it.

/// Password and token authentication module
pub mod auth;

/// Configuration management module
pub mod config;

/// Database connection module
pub mod db;

/// Request payload types module
pub mod dto;

/// API error types module
pub mod errors;

/// Request handlers module
pub mod handlers;

/// Data models module
pub mod models;

/// Progress aggregation module
pub mod progress;

/// Repository module for database operations
pub mod repo;

/// Spaced repetition scheduling module
pub mod scheduler;

/// Database schema module
pub mod schema;

/// Default syllabus and quotes module
pub mod seed;

/// XP and level arithmetic module
pub mod xp;

/// Shared test helpers
#[cfg(test)]
pub mod test_utils;

use axum::{
    extract::FromRef,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::AuthKeys;
use crate::handlers::*;

/// Shared application state handed to every handler.
///
/// Handlers that only touch storage extract the pool substate; the auth
/// handlers also extract the signing keys.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub auth: AuthKeys,
}

impl FromRef<AppState> for Arc<db::DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for AuthKeys {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Creates the application router with all routes
///
/// This function sets up the Axum router with all the API endpoints.
/// Routes whose handlers take an `AuthUser` argument reject requests
/// without a valid bearer token; the rest are public.
///
/// ### Arguments
///
/// * `state` - The application state shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes, a permissive CORS layer
/// and the application state
pub fn create_app(state: AppState) -> Router {
    // The frontend is served from a different origin, so allow any origin,
    // method and header. Credentials stay out of CORS; auth rides in the
    // Authorization header.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Service routes
        .route("/api/", get(root_handler))
        .route("/api/health", get(health_handler))
        .route("/api/quote", get(quote_handler))
        // Auth routes
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/me", get(me_handler))
        .route("/api/auth/profile", put(update_profile_handler))
        // User stat and gamification routes
        .route(
            "/api/user/stats",
            get(user_stats_handler).put(update_user_stats_handler),
        )
        .route("/api/user/xp", post(add_xp_handler))
        .route("/api/user/badges", get(badges_handler))
        .route("/api/user/badges/{badge_name}", post(award_badge_handler))
        .route("/api/user/level", get(level_handler))
        // Flashcard routes
        .route(
            "/api/flashcards",
            get(list_flashcards_handler).post(create_flashcard_handler),
        )
        .route(
            "/api/flashcards/{card_id}",
            get(get_flashcard_handler)
                .put(update_flashcard_handler)
                .delete(delete_flashcard_handler),
        )
        .route("/api/flashcards/{card_id}/review", put(review_flashcard_handler))
        .route("/api/flashcards/due/review", get(due_flashcards_handler))
        .route("/api/flashcards/stats/summary", get(flashcard_stats_handler))
        .route("/api/flashcards/session/start", post(study_session_handler))
        // Goal routes
        .route("/api/goals", get(list_goals_handler).post(create_goal_handler))
        .route(
            "/api/goals/{goal_id}",
            get(get_goal_handler)
                .put(update_goal_handler)
                .delete(delete_goal_handler),
        )
        .route("/api/goals/upcoming/deadlines", get(upcoming_deadlines_handler))
        .route("/api/goals/stats/overview", get(goal_stats_handler))
        .route(
            "/api/goals/calendar/events",
            get(list_events_handler).post(create_event_handler),
        )
        // Syllabus routes
        .route("/api/syllabus", get(organized_syllabus_handler))
        .route("/api/syllabus/search", get(search_syllabus_handler))
        .route("/api/syllabus/topic/{topic_id}", put(update_topic_handler))
        .route("/api/syllabus/progress/overall", get(overall_progress_handler))
        .route(
            "/api/syllabus/progress/subject/{subject}",
            get(subject_progress_handler),
        )
        .route("/api/syllabus/{exam_type}", get(track_syllabus_handler))
        // Test result routes
        .route("/api/tests", get(list_tests_handler).post(create_test_handler))
        .route("/api/tests/{test_id}", get(get_test_handler))
        .route("/api/tests/analytics/performance", get(test_analytics_handler))
        .route("/api/tests/analytics/weak-topics", get(weak_topics_handler))
        // Timetable routes
        .route(
            "/api/timetable",
            get(list_timetable_handler).post(create_timetable_handler),
        )
        .route(
            "/api/timetable/{entry_id}",
            put(update_timetable_handler).delete(delete_timetable_handler),
        )
        .route("/api/timetable/{entry_id}/complete", put(complete_task_handler))
        .route("/api/timetable/today", get(today_tasks_handler))
        .route("/api/timetable/progress/weekly", get(weekly_progress_handler))
        .route("/api/timetable/stats", get(timetable_stats_handler))
        // Allow the browser frontend to call the API cross-origin
        .layer(cors)
        // Add the application state
        .with_state(state)
}

/// Runs the embedded migrations
///
/// This function applies all database migrations to set up the schema.
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Panics
///
/// This function will panic if the migrations fail to run
pub fn run_migrations(conn: &mut diesel::SqliteConnection) {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    // Define the embedded migrations
    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    // Run all pending migrations
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
}
