use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{
    CreateEventDto, CreateGoalDto, DeadlineQuery, EventRangeQuery, GoalListQuery, MessageResponse,
    UpdateGoalDto,
};
use crate::errors::ApiError;
use crate::models::{CalendarEvent, Goal, GoalCategory, Priority};
use crate::progress::{self, GoalStats};
use crate::repo;
use crate::xp::{xp_for_event, XpEvent};

/// A goal whose deadline falls inside the lookahead window.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDeadline {
    pub id: String,
    pub title: String,
    pub deadline: NaiveDate,
    pub days_remaining: i64,
    pub progress: i32,
    pub priority: Priority,
    pub category: GoalCategory,
}

/// Goals due soon, nearest deadline first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDeadlinesResponse {
    pub upcoming_deadlines: Vec<UpcomingDeadline>,
    pub total_count: usize,
}

/// Handler for creating a new goal
///
/// This function handles POST requests to `/api/goals/`. Setting a goal
/// awards XP.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The authenticated user
/// * `payload` - The request payload containing the goal data
///
/// ### Returns
///
/// The newly created goal as JSON
#[instrument(skip(pool, payload), fields(user_id = %user.user_id, category = %payload.category.as_str()))]
pub async fn create_goal_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Extract and deserialize the JSON request body
    Json(payload): Json<CreateGoalDto>,
) -> Result<Json<Goal>, ApiError> {
    info!("Creating new goal");

    let goal = repo::create_goal(&pool, &user.user_id, payload).map_err(ApiError::Database)?;

    repo::add_xp(&pool, &user.user_id, xp_for_event(XpEvent::GoalCreated))
        .map_err(ApiError::Database)?;

    info!("Successfully created goal with id: {}", goal.id);

    Ok(Json(goal))
}

/// Handler for listing the user's goals
///
/// This function handles GET requests to `/api/goals/`, with optional
/// `category`, `priority` and `completed` query filters. Goals come back
/// ordered by deadline.
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn list_goals_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Query(query): Query<GoalListQuery>,
) -> Result<Json<Vec<Goal>>, ApiError> {
    debug!("Listing goals");

    let goals = repo::list_goals(&pool, &user.user_id, &query).map_err(ApiError::Database)?;

    debug!("Found {} goals", goals.len());

    Ok(Json(goals))
}

/// Handler for retrieving a specific goal
///
/// This function handles GET requests to `/api/goals/{goal_id}`.
#[instrument(skip(pool), fields(user_id = %user.user_id, goal_id = %goal_id))]
pub async fn get_goal_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Extract the goal ID from the URL path
    Path(goal_id): Path<String>,
) -> Result<Json<Goal>, ApiError> {
    debug!("Getting goal");

    let goal = repo::get_goal(&pool, &user.user_id, &goal_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Goal"))?;

    Ok(Json(goal))
}

/// Handler for updating a goal
///
/// This function handles PUT requests to `/api/goals/{goal_id}`. Driving
/// progress to 100 completes the goal and awards XP scaled by the goal's
/// priority; the award fires only on that first completion.
///
/// ### Returns
///
/// The updated goal as JSON
#[instrument(skip(pool, payload), fields(user_id = %user.user_id, goal_id = %goal_id))]
pub async fn update_goal_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(goal_id): Path<String>,
    Json(payload): Json<UpdateGoalDto>,
) -> Result<Json<Goal>, ApiError> {
    info!("Updating goal");

    let (goal, newly_completed) = repo::update_goal(&pool, &user.user_id, &goal_id, payload)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Goal"))?;

    if newly_completed {
        let amount = xp_for_event(XpEvent::GoalCompleted {
            priority: goal.priority,
        });
        repo::add_xp(&pool, &user.user_id, amount).map_err(ApiError::Database)?;
        info!("Goal completed, awarded {} XP", amount);
    }

    Ok(Json(goal))
}

/// Handler for deleting a goal
///
/// This function handles DELETE requests to `/api/goals/{goal_id}`.
#[instrument(skip(pool), fields(user_id = %user.user_id, goal_id = %goal_id))]
pub async fn delete_goal_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(goal_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("Deleting goal");

    let deleted = repo::delete_goal(&pool, &user.user_id, &goal_id).map_err(ApiError::Database)?;
    if !deleted {
        return Err(ApiError::NotFound("Goal"));
    }

    Ok(Json(MessageResponse::new("Goal deleted successfully")))
}

/// Handler for listing goals with upcoming deadlines
///
/// This function handles GET requests to
/// `/api/goals/upcoming/deadlines`. Only incomplete goals whose deadline
/// falls within the next `days` days (today inclusive) are returned.
///
/// ### Returns
///
/// Deadline summaries nearest first, with a total count, as JSON
#[instrument(skip(pool), fields(user_id = %user.user_id, days = %query.days))]
pub async fn upcoming_deadlines_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Query(query): Query<DeadlineQuery>,
) -> Result<Json<UpcomingDeadlinesResponse>, ApiError> {
    debug!("Listing upcoming deadlines");

    let today = Utc::now().date_naive();
    let goals = repo::list_upcoming_goals(&pool, &user.user_id, query.days)
        .map_err(ApiError::Database)?;

    let upcoming_deadlines: Vec<UpcomingDeadline> = goals
        .into_iter()
        .map(|goal| UpcomingDeadline {
            days_remaining: (goal.deadline - today).num_days(),
            id: goal.id,
            title: goal.title,
            deadline: goal.deadline,
            progress: goal.progress,
            priority: goal.priority,
            category: goal.category,
        })
        .collect();

    let total_count = upcoming_deadlines.len();

    Ok(Json(UpcomingDeadlinesResponse {
        upcoming_deadlines,
        total_count,
    }))
}

/// Handler for the goal statistics overview
///
/// This function handles GET requests to `/api/goals/stats/overview`.
///
/// ### Returns
///
/// Completion counts, average progress and per-category and per-priority
/// breakdowns as JSON
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn goal_stats_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<GoalStats>, ApiError> {
    debug!("Computing goal stats");

    let goals = repo::list_goals(&pool, &user.user_id, &GoalListQuery::default())
        .map_err(ApiError::Database)?;

    Ok(Json(progress::goal_stats(&goals)))
}

/// Handler for listing calendar events
///
/// This function handles GET requests to `/api/goals/calendar/events`,
/// with optional inclusive `start_date` and `end_date` bounds.
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn list_events_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Query(query): Query<EventRangeQuery>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError> {
    debug!("Listing calendar events");

    let events = repo::list_events(&pool, &user.user_id, &query).map_err(ApiError::Database)?;

    debug!("Found {} calendar events", events.len());

    Ok(Json(events))
}

/// Handler for creating a calendar event
///
/// This function handles POST requests to
/// `/api/goals/calendar/events`.
#[instrument(skip(pool, payload), fields(user_id = %user.user_id, event_type = %payload.event_type.as_str()))]
pub async fn create_event_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Extract and deserialize the JSON request body
    Json(payload): Json<CreateEventDto>,
) -> Result<Json<CalendarEvent>, ApiError> {
    info!("Creating calendar event");

    let event = repo::create_event(&pool, &user.user_id, payload).map_err(ApiError::Database)?;

    info!("Successfully created calendar event with id: {}", event.id);

    Ok(Json(event))
}
