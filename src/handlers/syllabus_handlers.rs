use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{SearchQuery, UpdateTopicDto};
use crate::errors::ApiError;
use crate::models::{ExamType, SyllabusItem, TopicStatus};
use crate::progress::{self, OverallProgress, SubjectReport};
use crate::repo;
use crate::xp::{xp_for_event, XpEvent};

/// A topic as shown in the organized syllabus views.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummary {
    pub id: String,
    pub topic: String,
    pub subtopics: Vec<String>,
    pub status: TopicStatus,
    pub high_yield: bool,
    pub updated_at: NaiveDateTime,
}

impl From<SyllabusItem> for TopicSummary {
    fn from(item: SyllabusItem) -> Self {
        TopicSummary {
            id: item.id,
            topic: item.topic,
            subtopics: item.subtopics.0,
            status: item.status,
            high_yield: item.high_yield,
            updated_at: item.updated_at,
        }
    }
}

/// The full syllabus grouped by exam track, then by subject.
///
/// Both tracks are always present, even when one has no topics yet.
#[derive(Debug, Serialize)]
pub struct OrganizedSyllabus {
    pub mains: HashMap<String, Vec<TopicSummary>>,
    pub advanced: HashMap<String, Vec<TopicSummary>>,
}

/// Response for a topic update, carrying XP details when the update
/// mastered the topic.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicUpdateResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp_awarded: Option<i32>,
    #[serde(rename = "newTotalXP", skip_serializing_if = "Option::is_none")]
    pub new_total_xp: Option<i32>,
}

/// A search hit with enough context to jump to the topic.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    #[serde(rename = "type")]
    pub exam_type: ExamType,
    pub subject: String,
    pub topic: String,
    pub subtopics: Vec<String>,
    pub status: TopicStatus,
    pub high_yield: bool,
    pub updated_at: NaiveDateTime,
}

/// Search results with the echoed query.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<SearchHit>,
}

fn group_by_subject(items: Vec<SyllabusItem>) -> HashMap<String, Vec<TopicSummary>> {
    let mut grouped: HashMap<String, Vec<TopicSummary>> = HashMap::new();
    for item in items {
        grouped
            .entry(item.subject.clone())
            .or_default()
            .push(TopicSummary::from(item));
    }
    grouped
}

/// Handler for the complete organized syllabus
///
/// This function handles GET requests to `/api/syllabus/`.
///
/// ### Returns
///
/// Topics grouped first by exam track and then by subject as JSON
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn organized_syllabus_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<OrganizedSyllabus>, ApiError> {
    debug!("Fetching organized syllabus");

    let items = repo::list_syllabus(&pool, &user.user_id).map_err(ApiError::Database)?;

    let (mains, advanced): (Vec<_>, Vec<_>) = items
        .into_iter()
        .partition(|item| item.exam_type == ExamType::Mains);

    Ok(Json(OrganizedSyllabus {
        mains: group_by_subject(mains),
        advanced: group_by_subject(advanced),
    }))
}

/// Handler for one exam track's syllabus
///
/// This function handles GET requests to `/api/syllabus/{exam_type}`.
///
/// ### Returns
///
/// The track's topics grouped by subject as JSON
///
/// ### Errors
///
/// Returns a validation error for tracks other than mains or advanced
#[instrument(skip(pool), fields(user_id = %user.user_id, exam_type = %exam_type))]
pub async fn track_syllabus_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Extract the exam track from the URL path
    Path(exam_type): Path<String>,
) -> Result<Json<HashMap<String, Vec<TopicSummary>>>, ApiError> {
    debug!("Fetching syllabus for exam track");

    let exam_type = ExamType::parse(&exam_type).ok_or_else(|| {
        ApiError::Validation("Exam type must be 'mains' or 'advanced'".to_string())
    })?;

    let items =
        repo::list_syllabus_for_exam(&pool, &user.user_id, exam_type).map_err(ApiError::Database)?;

    Ok(Json(group_by_subject(items)))
}

/// Handler for updating a topic's status
///
/// This function handles PUT requests to
/// `/api/syllabus/topic/{topic_id}`. Mastering a topic for the first
/// time awards XP, more when the topic is marked high yield.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The authenticated user
/// * `topic_id` - The ID of the topic being updated
/// * `payload` - The new status and/or high-yield flag
///
/// ### Returns
///
/// A confirmation message, with XP details when the topic was mastered
#[instrument(skip(pool, payload), fields(user_id = %user.user_id, topic_id = %topic_id))]
pub async fn update_topic_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(topic_id): Path<String>,
    Json(payload): Json<UpdateTopicDto>,
) -> Result<Json<TopicUpdateResponse>, ApiError> {
    info!("Updating syllabus topic");

    let before = repo::get_topic(&pool, &user.user_id, &topic_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Topic"))?;

    let updated = repo::update_topic(
        &pool,
        &user.user_id,
        &topic_id,
        payload.status,
        payload.high_yield,
    )
    .map_err(ApiError::Database)?
    .ok_or(ApiError::NotFound("Topic"))?;

    let newly_mastered =
        payload.status == Some(TopicStatus::Mastered) && before.status != TopicStatus::Mastered;

    if newly_mastered {
        let amount = xp_for_event(XpEvent::TopicMastered {
            high_yield: updated.high_yield,
        });
        let award = repo::add_xp(&pool, &user.user_id, amount)
            .map_err(ApiError::Database)?
            .ok_or(ApiError::NotFound("User"))?;

        info!("Topic mastered, awarded {} XP", amount);

        return Ok(Json(TopicUpdateResponse {
            message: "Topic updated successfully".to_string(),
            xp_awarded: Some(amount),
            new_total_xp: Some(award.new_total_xp),
        }));
    }

    Ok(Json(TopicUpdateResponse {
        message: "Topic updated successfully".to_string(),
        xp_awarded: None,
        new_total_xp: None,
    }))
}

/// Handler for overall syllabus progress
///
/// This function handles GET requests to
/// `/api/syllabus/progress/overall`. Only mastered topics count as
/// completed.
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn overall_progress_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<OverallProgress>, ApiError> {
    debug!("Computing overall syllabus progress");

    let items = repo::list_syllabus(&pool, &user.user_id).map_err(ApiError::Database)?;

    Ok(Json(progress::syllabus_progress(&items)))
}

/// Handler for one subject's progress
///
/// This function handles GET requests to
/// `/api/syllabus/progress/subject/{subject}`.
///
/// ### Errors
///
/// Returns a not-found error when the subject has no topics
#[instrument(skip(pool), fields(user_id = %user.user_id, subject = %subject))]
pub async fn subject_progress_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Extract the subject name from the URL path
    Path(subject): Path<String>,
) -> Result<Json<SubjectReport>, ApiError> {
    debug!("Computing subject progress");

    let items = repo::list_syllabus_for_subject(&pool, &user.user_id, &subject)
        .map_err(ApiError::Database)?;

    if items.is_empty() {
        return Err(ApiError::SubjectEmpty(subject));
    }

    Ok(Json(progress::subject_progress(&subject, &items)))
}

/// Handler for searching syllabus topics
///
/// This function handles GET requests to `/api/syllabus/search`. The
/// query matches topic names and subtopics case-insensitively, and can
/// be narrowed by subject, status and high-yield filters.
///
/// ### Returns
///
/// The matching topics with the echoed query and a hit count as JSON
#[instrument(skip(pool), fields(user_id = %user.user_id, query = %query.query))]
pub async fn search_syllabus_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    debug!("Searching syllabus topics");

    let matches = repo::search_topics(&pool, &user.user_id, &query).map_err(ApiError::Database)?;

    let results: Vec<SearchHit> = matches
        .into_iter()
        .map(|item| SearchHit {
            id: item.id,
            exam_type: item.exam_type,
            subject: item.subject,
            topic: item.topic,
            subtopics: item.subtopics.0,
            status: item.status,
            high_yield: item.high_yield,
            updated_at: item.updated_at,
        })
        .collect();

    debug!("Found {} matching topics", results.len());

    Ok(Json(SearchResponse {
        query: query.query,
        total_results: results.len(),
        results,
    }))
}
