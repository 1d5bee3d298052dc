use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{AddXpDto, MessageResponse, StatsUpdateDto};
use crate::errors::ApiError;
use crate::repo;
use crate::xp::{self, LevelInfo};

/// A single earned badge in the stats report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeInfo {
    pub id: String,
    pub name: String,
    pub earned: bool,
    pub earned_date: String,
}

/// Aggregated statistics for the authenticated user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    #[serde(rename = "totalXP")]
    pub total_xp: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_study_hours: i32,
    pub completed_topics: i64,
    pub total_topics: i64,
    pub badges: Vec<BadgeInfo>,
}

/// Response for an explicit XP grant.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XpGrantResponse {
    pub message: String,
    pub reason: String,
    #[serde(rename = "newTotalXP")]
    pub new_total_xp: i32,
    pub new_level: i32,
    pub leveled_up: bool,
}

/// The user's earned badge names.
#[derive(Debug, Serialize)]
pub struct BadgeListResponse {
    pub badges: Vec<String>,
}

/// Handler for the authenticated user's statistics
///
/// This function handles GET requests to `/api/user/stats`. Topic counts
/// come from the syllabus, where only mastered topics count as completed.
///
/// ### Returns
///
/// The user's XP, streaks, study hours, topic counts and badges as JSON
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn user_stats_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<UserStatsResponse>, ApiError> {
    debug!("Fetching user stats");

    let record = repo::get_user(&pool, &user.user_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("User"))?;

    let (total_topics, completed_topics) =
        repo::count_topics(&pool, &user.user_id).map_err(ApiError::Database)?;

    let earned_date = record.created_at.format("%Y-%m-%d").to_string();
    let badges = record
        .badges
        .0
        .iter()
        .map(|name| BadgeInfo {
            id: name.clone(),
            name: name.clone(),
            earned: true,
            earned_date: earned_date.clone(),
        })
        .collect();

    Ok(Json(UserStatsResponse {
        total_xp: record.total_xp,
        current_streak: record.current_streak,
        longest_streak: record.longest_streak,
        total_study_hours: record.total_study_hours,
        completed_topics,
        total_topics,
        badges,
    }))
}

/// Handler for overwriting user statistics
///
/// This function handles PUT requests to `/api/user/stats`. Supplying a
/// new XP total rederives the level; raising the current streak above the
/// longest streak raises the longest as well. An empty payload is
/// accepted without touching the record.
#[instrument(skip(pool, payload), fields(user_id = %user.user_id))]
pub async fn update_user_stats_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Json(payload): Json<StatsUpdateDto>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("Updating user stats");

    if !payload.is_empty() {
        repo::update_stats(&pool, &user.user_id, &payload)
            .map_err(ApiError::Database)?
            .ok_or(ApiError::NotFound("User"))?;
    }

    Ok(Json(MessageResponse::new("Stats updated successfully")))
}

/// Handler for granting XP directly
///
/// This function handles POST requests to `/api/user/xp`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The authenticated user
/// * `payload` - The XP amount and an optional reason for the grant
///
/// ### Returns
///
/// The new XP total and level, and whether a level boundary was crossed
#[instrument(skip(pool), fields(user_id = %user.user_id, amount = %payload.amount))]
pub async fn add_xp_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Json(payload): Json<AddXpDto>,
) -> Result<Json<XpGrantResponse>, ApiError> {
    info!("Adding XP to user");

    let award = repo::add_xp(&pool, &user.user_id, payload.amount)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(XpGrantResponse {
        message: format!("Added {} XP", award.amount),
        reason: payload
            .reason
            .unwrap_or_else(|| "Study activity".to_string()),
        new_total_xp: award.new_total_xp,
        new_level: award.new_level,
        leveled_up: award.leveled_up,
    }))
}

/// Handler for awarding a badge by name
///
/// This function handles POST requests to `/api/user/badges/{badge_name}`.
/// Awarding the same badge twice is harmless and reported as already
/// earned.
#[instrument(skip(pool), fields(user_id = %user.user_id, badge = %badge_name))]
pub async fn award_badge_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Extract the badge name from the URL path
    Path(badge_name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("Awarding badge");

    let newly_awarded = repo::award_badge(&pool, &user.user_id, &badge_name)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("User"))?;

    let message = if newly_awarded {
        format!("Badge '{}' awarded successfully", badge_name)
    } else {
        format!("Badge '{}' already earned", badge_name)
    };

    Ok(Json(MessageResponse::new(message)))
}

/// Handler for listing the user's earned badges
///
/// This function handles GET requests to `/api/user/badges`.
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn badges_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<BadgeListResponse>, ApiError> {
    debug!("Fetching user badges");

    let record = repo::get_user(&pool, &user.user_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(BadgeListResponse {
        badges: record.badges.0,
    }))
}

/// Handler for the user's level progress report
///
/// This function handles GET requests to `/api/user/level`.
///
/// ### Returns
///
/// The current level band and progress within it as JSON
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn level_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<LevelInfo>, ApiError> {
    debug!("Fetching user level info");

    let record = repo::get_user(&pool, &user.user_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(xp::level_info(record.total_xp)))
}
