use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{CreateTimetableDto, MessageResponse, TimetableListQuery, UpdateTimetableDto};
use crate::errors::ApiError;
use crate::models::TimetableEntry;
use crate::progress::{self, TimetableStats, WeeklyProgress};
use crate::repo;
use crate::xp::{xp_for_event, XpEvent};

/// Handler for creating a timetable entry
///
/// This function handles POST requests to `/api/timetable/`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The authenticated user
/// * `payload` - The request payload containing the slot data
///
/// ### Returns
///
/// The newly created timetable entry as JSON
#[instrument(skip(pool, payload), fields(user_id = %user.user_id, day = %payload.day.as_str()))]
pub async fn create_timetable_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Extract and deserialize the JSON request body
    Json(payload): Json<CreateTimetableDto>,
) -> Result<Json<TimetableEntry>, ApiError> {
    info!("Creating timetable entry");

    let entry =
        repo::create_timetable_entry(&pool, &user.user_id, payload).map_err(ApiError::Database)?;

    info!("Successfully created timetable entry with id: {}", entry.id);

    Ok(Json(entry))
}

/// Handler for listing timetable entries
///
/// This function handles GET requests to `/api/timetable/`, with an
/// optional `day` filter. Entries come back in weekday order, then by
/// time slot.
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn list_timetable_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Query(query): Query<TimetableListQuery>,
) -> Result<Json<Vec<TimetableEntry>>, ApiError> {
    debug!("Listing timetable entries");

    let entries =
        repo::list_timetable(&pool, &user.user_id, query.day).map_err(ApiError::Database)?;

    debug!("Found {} timetable entries", entries.len());

    Ok(Json(entries))
}

/// Handler for updating a timetable entry
///
/// This function handles PUT requests to `/api/timetable/{entry_id}`.
/// Completing a task for the first time awards XP; repeating the
/// completion does not.
///
/// ### Returns
///
/// The updated timetable entry as JSON
#[instrument(skip(pool, payload), fields(user_id = %user.user_id, entry_id = %entry_id))]
pub async fn update_timetable_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(entry_id): Path<String>,
    Json(payload): Json<UpdateTimetableDto>,
) -> Result<Json<TimetableEntry>, ApiError> {
    info!("Updating timetable entry");

    let (entry, newly_completed) =
        repo::update_timetable_entry(&pool, &user.user_id, &entry_id, payload)
            .map_err(ApiError::Database)?
            .ok_or(ApiError::NotFound("Timetable entry"))?;

    if newly_completed {
        repo::add_xp(
            &pool,
            &user.user_id,
            xp_for_event(XpEvent::TimetableTaskCompleted),
        )
        .map_err(ApiError::Database)?;
        info!("Task completed, awarded XP");
    }

    Ok(Json(entry))
}

/// Handler for marking a task complete
///
/// This function handles PUT requests to
/// `/api/timetable/{entry_id}/complete`. This is a shorthand for an
/// update that only sets `completed`.
#[instrument(skip(pool), fields(user_id = %user.user_id, entry_id = %entry_id))]
pub async fn complete_task_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(entry_id): Path<String>,
) -> Result<Json<TimetableEntry>, ApiError> {
    let update = UpdateTimetableDto {
        day: None,
        time_slot: None,
        subject: None,
        topic: None,
        completed: Some(true),
    };

    update_timetable_handler(State(pool), user, Path(entry_id), Json(update)).await
}

/// Handler for deleting a timetable entry
///
/// This function handles DELETE requests to `/api/timetable/{entry_id}`.
#[instrument(skip(pool), fields(user_id = %user.user_id, entry_id = %entry_id))]
pub async fn delete_timetable_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(entry_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("Deleting timetable entry");

    let deleted = repo::delete_timetable_entry(&pool, &user.user_id, &entry_id)
        .map_err(ApiError::Database)?;
    if !deleted {
        return Err(ApiError::NotFound("Timetable entry"));
    }

    Ok(Json(MessageResponse::new(
        "Timetable entry deleted successfully",
    )))
}

/// Handler for today's tasks
///
/// This function handles GET requests to `/api/timetable/today`,
/// returning the current weekday's entries ordered by time slot.
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn today_tasks_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<Vec<TimetableEntry>>, ApiError> {
    debug!("Listing today's tasks");

    let entries = repo::list_today(&pool, &user.user_id).map_err(ApiError::Database)?;

    Ok(Json(entries))
}

/// Handler for the weekly completion report
///
/// This function handles GET requests to
/// `/api/timetable/progress/weekly`.
///
/// ### Returns
///
/// Task totals and a per-day completion percentage as JSON
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn weekly_progress_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<WeeklyProgress>, ApiError> {
    debug!("Computing weekly progress");

    let entries = repo::list_timetable(&pool, &user.user_id, None).map_err(ApiError::Database)?;

    Ok(Json(progress::weekly_progress(&entries)))
}

/// Handler for timetable statistics
///
/// This function handles GET requests to `/api/timetable/stats`.
///
/// ### Returns
///
/// Per-subject and per-time-slot completion counts with an overall
/// completion rate as JSON
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn timetable_stats_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<TimetableStats>, ApiError> {
    debug!("Computing timetable stats");

    let entries = repo::list_timetable(&pool, &user.user_id, None).map_err(ApiError::Database)?;

    Ok(Json(progress::timetable_stats(&entries)))
}
