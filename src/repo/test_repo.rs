use crate::db::DbPool;
use crate::dto::{CreateTestDto, TestListQuery};
use crate::models::{ExamType, TestResult};
use crate::schema::test_results;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Records a completed mock test
///
/// Accuracy is derived from the score and total marks at insert time.
#[instrument(skip(pool, result), fields(user_id = %user_id, exam_type = ?result.exam_type))]
pub fn create_test_result(pool: &DbPool, user_id: &str, result: CreateTestDto) -> Result<TestResult> {
    debug!("Recording test result");

    let conn = &mut pool.get()?;

    let new_result = TestResult::new(
        user_id,
        result.exam_type,
        result.score,
        result.total_marks,
        result.time_spent,
        result.subjects,
        result.weak_topics,
    );

    diesel::insert_into(test_results::table)
        .values(&new_result)
        .execute(conn)?;

    info!(
        "Recorded test result {} ({:.1}% accuracy)",
        new_result.id, new_result.accuracy
    );

    Ok(new_result)
}

/// Lists a user's test results, newest first, up to the requested limit
#[instrument(skip(pool, query), fields(user_id = %user_id, limit = %query.limit))]
pub fn list_test_results(
    pool: &DbPool,
    user_id: &str,
    query: &TestListQuery,
) -> Result<Vec<TestResult>> {
    let conn = &mut pool.get()?;

    let mut results = test_results::table
        .filter(test_results::user_id.eq(user_id))
        .into_boxed();

    if let Some(test_type) = query.test_type {
        results = results.filter(test_results::exam_type.eq(test_type));
    }

    let result = results
        .order(test_results::date.desc())
        .limit(query.limit)
        .load::<TestResult>(conn)?;

    Ok(result)
}

/// Retrieves one test result, scoped to its owner
#[instrument(skip(pool), fields(user_id = %user_id, test_id = %test_id))]
pub fn get_test_result(pool: &DbPool, user_id: &str, test_id: &str) -> Result<Option<TestResult>> {
    let conn = &mut pool.get()?;

    let result = test_results::table
        .find(test_id)
        .filter(test_results::user_id.eq(user_id))
        .first::<TestResult>(conn)
        .optional()?;

    Ok(result)
}

/// Lists every matching test result newest first, for the analytics
/// aggregations
#[instrument(skip(pool), fields(user_id = %user_id, test_type = ?test_type))]
pub fn list_results_for_analytics(
    pool: &DbPool,
    user_id: &str,
    test_type: Option<ExamType>,
) -> Result<Vec<TestResult>> {
    let conn = &mut pool.get()?;

    let mut results = test_results::table
        .filter(test_results::user_id.eq(user_id))
        .into_boxed();

    if let Some(test_type) = test_type {
        results = results.filter(test_results::exam_type.eq(test_type));
    }

    let result = results
        .order(test_results::date.desc())
        .load::<TestResult>(conn)?;

    Ok(result)
}
