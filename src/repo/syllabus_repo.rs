use crate::db::DbPool;
use crate::dto::SearchQuery;
use crate::models::{ExamType, SyllabusItem, TopicStatus};
use crate::schema::syllabus_items;
use anyhow::Result;
use chrono::Utc;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Retrieves a user's full syllabus
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn list_syllabus(pool: &DbPool, user_id: &str) -> Result<Vec<SyllabusItem>> {
    let conn = &mut pool.get()?;

    let result = syllabus_items::table
        .filter(syllabus_items::user_id.eq(user_id))
        .load::<SyllabusItem>(conn)?;

    Ok(result)
}

/// Retrieves a user's syllabus for one exam track
#[instrument(skip(pool), fields(user_id = %user_id, exam_type = ?exam_type))]
pub fn list_syllabus_for_exam(
    pool: &DbPool,
    user_id: &str,
    exam_type: ExamType,
) -> Result<Vec<SyllabusItem>> {
    let conn = &mut pool.get()?;

    let result = syllabus_items::table
        .filter(syllabus_items::user_id.eq(user_id))
        .filter(syllabus_items::exam_type.eq(exam_type))
        .load::<SyllabusItem>(conn)?;

    Ok(result)
}

/// Retrieves a user's syllabus items for one subject
#[instrument(skip(pool), fields(user_id = %user_id, subject = %subject))]
pub fn list_syllabus_for_subject(
    pool: &DbPool,
    user_id: &str,
    subject: &str,
) -> Result<Vec<SyllabusItem>> {
    let conn = &mut pool.get()?;

    let result = syllabus_items::table
        .filter(syllabus_items::user_id.eq(user_id))
        .filter(syllabus_items::subject.eq(subject))
        .load::<SyllabusItem>(conn)?;

    Ok(result)
}

/// Retrieves one syllabus topic, scoped to its owner
#[instrument(skip(pool), fields(user_id = %user_id, topic_id = %topic_id))]
pub fn get_topic(pool: &DbPool, user_id: &str, topic_id: &str) -> Result<Option<SyllabusItem>> {
    let conn = &mut pool.get()?;

    let result = syllabus_items::table
        .find(topic_id)
        .filter(syllabus_items::user_id.eq(user_id))
        .first::<SyllabusItem>(conn)
        .optional()?;

    Ok(result)
}

/// Updates a topic's tracking state
///
/// Either field may be omitted to leave it unchanged. The update timestamp
/// is refreshed whenever anything is written.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The topic's owner
/// * `topic_id` - The topic to update
/// * `status` - The new completion status, if it should change
/// * `high_yield` - The new high-yield flag, if it should change
///
/// ### Returns
///
/// The refreshed SyllabusItem, or None if the user owns no such topic
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database update fails
#[instrument(skip(pool), fields(user_id = %user_id, topic_id = %topic_id))]
pub fn update_topic(
    pool: &DbPool,
    user_id: &str,
    topic_id: &str,
    status: Option<TopicStatus>,
    high_yield: Option<bool>,
) -> Result<Option<SyllabusItem>> {
    debug!("Updating syllabus topic");

    let conn = &mut pool.get()?;

    let Some(mut item) = syllabus_items::table
        .find(topic_id)
        .filter(syllabus_items::user_id.eq(user_id))
        .first::<SyllabusItem>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    if let Some(status) = status {
        item.status = status;
    }
    if let Some(high_yield) = high_yield {
        item.high_yield = high_yield;
    }
    item.updated_at = Utc::now().naive_utc();

    diesel::update(syllabus_items::table.find(topic_id))
        .set((
            syllabus_items::status.eq(item.status),
            syllabus_items::high_yield.eq(item.high_yield),
            syllabus_items::updated_at.eq(item.updated_at),
        ))
        .execute(conn)?;

    info!("Updated topic {} to {:?}", topic_id, item.status);

    Ok(Some(item))
}

/// Searches a user's syllabus by topic and subtopic names
///
/// Structured filters (subject, status, high-yield) narrow the candidate
/// set in the database; the query string is then matched case-insensitively
/// against each topic name and its subtopics.
#[instrument(skip(pool, query), fields(user_id = %user_id, query = %query.query))]
pub fn search_topics(
    pool: &DbPool,
    user_id: &str,
    query: &SearchQuery,
) -> Result<Vec<SyllabusItem>> {
    let conn = &mut pool.get()?;

    let mut candidates = syllabus_items::table
        .filter(syllabus_items::user_id.eq(user_id))
        .into_boxed();

    if let Some(ref subject) = query.subject {
        candidates = candidates.filter(syllabus_items::subject.eq(subject));
    }
    if let Some(status) = query.status {
        candidates = candidates.filter(syllabus_items::status.eq(status));
    }
    if let Some(high_yield) = query.high_yield {
        candidates = candidates.filter(syllabus_items::high_yield.eq(high_yield));
    }

    let items = candidates.load::<SyllabusItem>(conn)?;

    let needle = query.query.to_lowercase();
    let matches: Vec<SyllabusItem> = items
        .into_iter()
        .filter(|item| {
            item.topic.to_lowercase().contains(&needle)
                || item
                    .subtopics
                    .0
                    .iter()
                    .any(|subtopic| subtopic.to_lowercase().contains(&needle))
        })
        .collect();

    debug!("Search matched {} topics", matches.len());

    Ok(matches)
}

/// Total and mastered topic counts for a user, used by the stats snapshot
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn count_topics(pool: &DbPool, user_id: &str) -> Result<(i64, i64)> {
    let conn = &mut pool.get()?;

    let total: i64 = syllabus_items::table
        .filter(syllabus_items::user_id.eq(user_id))
        .count()
        .get_result(conn)?;

    let mastered: i64 = syllabus_items::table
        .filter(syllabus_items::user_id.eq(user_id))
        .filter(syllabus_items::status.eq(TopicStatus::Mastered))
        .count()
        .get_result(conn)?;

    Ok((total, mastered))
}
