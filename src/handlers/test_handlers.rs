use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{CreateTestDto, TestListQuery, TestTypeQuery};
use crate::errors::ApiError;
use crate::models::TestResult;
use crate::progress::{self, TestAnalytics, WeakTopicReport};
use crate::repo;
use crate::xp::{xp_for_event, XpEvent};

/// Handler for recording a test result
///
/// This function handles POST requests to `/api/tests/`. The result's
/// accuracy is derived from score and total marks, and the user earns
/// XP scaled by how well the test went.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The authenticated user
/// * `payload` - The request payload containing the test outcome
///
/// ### Returns
///
/// The stored test result as JSON
#[instrument(skip(pool, payload), fields(user_id = %user.user_id, exam_type = %payload.exam_type.as_str(), score = %payload.score))]
pub async fn create_test_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Extract and deserialize the JSON request body
    Json(payload): Json<CreateTestDto>,
) -> Result<Json<TestResult>, ApiError> {
    info!("Recording test result");

    let result =
        repo::create_test_result(&pool, &user.user_id, payload).map_err(ApiError::Database)?;

    let amount = xp_for_event(XpEvent::TestCompleted {
        accuracy: result.percentage(),
    });
    repo::add_xp(&pool, &user.user_id, amount).map_err(ApiError::Database)?;

    info!(
        "Successfully recorded test result with id: {} ({} XP)",
        result.id, amount
    );

    Ok(Json(result))
}

/// Handler for listing recent test results
///
/// This function handles GET requests to `/api/tests/`, newest first,
/// with an optional `test_type` filter and a result `limit`.
#[instrument(skip(pool), fields(user_id = %user.user_id, limit = %query.limit))]
pub async fn list_tests_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Query(query): Query<TestListQuery>,
) -> Result<Json<Vec<TestResult>>, ApiError> {
    debug!("Listing test results");

    let results =
        repo::list_test_results(&pool, &user.user_id, &query).map_err(ApiError::Database)?;

    debug!("Found {} test results", results.len());

    Ok(Json(results))
}

/// Handler for retrieving a specific test result
///
/// This function handles GET requests to `/api/tests/{test_id}`.
#[instrument(skip(pool), fields(user_id = %user.user_id, test_id = %test_id))]
pub async fn get_test_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Extract the test ID from the URL path
    Path(test_id): Path<String>,
) -> Result<Json<TestResult>, ApiError> {
    debug!("Getting test result");

    let result = repo::get_test_result(&pool, &user.user_id, &test_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Test"))?;

    Ok(Json(result))
}

/// Handler for the performance analytics report
///
/// This function handles GET requests to
/// `/api/tests/analytics/performance`, optionally scoped to one exam
/// track.
///
/// ### Returns
///
/// Score trends, subject averages and recurring weak topics as JSON
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn test_analytics_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Query(query): Query<TestTypeQuery>,
) -> Result<Json<TestAnalytics>, ApiError> {
    debug!("Computing test analytics");

    let results = repo::list_results_for_analytics(&pool, &user.user_id, query.test_type)
        .map_err(ApiError::Database)?;

    Ok(Json(progress::test_analytics(&results)))
}

/// Handler for the weak topics report
///
/// This function handles GET requests to
/// `/api/tests/analytics/weak-topics`, optionally scoped to one exam
/// track. Topics are ranked by how often they recur across recorded
/// tests.
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn weak_topics_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Query(query): Query<TestTypeQuery>,
) -> Result<Json<WeakTopicReport>, ApiError> {
    debug!("Computing weak topic report");

    let results = repo::list_results_for_analytics(&pool, &user.user_id, query.test_type)
        .map_err(ApiError::Database)?;

    Ok(Json(progress::weak_topic_report(&results)))
}
