use crate::db::DbPool;
use crate::dto::{CreateGoalDto, GoalListQuery, UpdateGoalDto};
use crate::models::Goal;
use crate::schema::goals;
use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new goal for a user
#[instrument(skip(pool, goal), fields(user_id = %user_id, title = %goal.title))]
pub fn create_goal(pool: &DbPool, user_id: &str, goal: CreateGoalDto) -> Result<Goal> {
    debug!("Creating new goal");

    let conn = &mut pool.get()?;

    let new_goal = Goal::new(
        user_id,
        goal.title,
        goal.description,
        goal.deadline,
        goal.priority,
        goal.category,
    );

    diesel::insert_into(goals::table)
        .values(&new_goal)
        .execute(conn)?;

    info!("Created goal {}", new_goal.id);

    Ok(new_goal)
}

/// Lists a user's goals ordered by deadline, with optional filters
#[instrument(skip(pool, query), fields(user_id = %user_id))]
pub fn list_goals(pool: &DbPool, user_id: &str, query: &GoalListQuery) -> Result<Vec<Goal>> {
    let conn = &mut pool.get()?;

    let mut filtered = goals::table
        .filter(goals::user_id.eq(user_id))
        .into_boxed();

    if let Some(category) = query.category {
        filtered = filtered.filter(goals::category.eq(category));
    }
    if let Some(priority) = query.priority {
        filtered = filtered.filter(goals::priority.eq(priority));
    }
    if let Some(completed) = query.completed {
        filtered = filtered.filter(goals::completed.eq(completed));
    }

    let result = filtered.order(goals::deadline.asc()).load::<Goal>(conn)?;

    Ok(result)
}

/// Retrieves one goal, scoped to its owner
#[instrument(skip(pool), fields(user_id = %user_id, goal_id = %goal_id))]
pub fn get_goal(pool: &DbPool, user_id: &str, goal_id: &str) -> Result<Option<Goal>> {
    let conn = &mut pool.get()?;

    let result = goals::table
        .find(goal_id)
        .filter(goals::user_id.eq(user_id))
        .first::<Goal>(conn)
        .optional()?;

    Ok(result)
}

/// Applies a partial update to a goal
///
/// Progress is clamped to [0, 100]. The first time an update pushes
/// progress to 100 on a goal that was not already completed, the goal is
/// marked completed and the update is flagged as a fresh completion so the
/// caller can award XP. An explicit `completed` value in the update is
/// applied last and overrides the derived flag.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The goal's owner
/// * `goal_id` - The goal to update
/// * `update` - The fields to change
///
/// ### Returns
///
/// The refreshed Goal and whether this update freshly completed it, or
/// None if the user owns no such goal
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database update fails
#[instrument(skip(pool, update), fields(user_id = %user_id, goal_id = %goal_id))]
pub fn update_goal(
    pool: &DbPool,
    user_id: &str,
    goal_id: &str,
    update: UpdateGoalDto,
) -> Result<Option<(Goal, bool)>> {
    debug!("Updating goal");

    let conn = &mut pool.get()?;

    let Some(mut goal) = goals::table
        .find(goal_id)
        .filter(goals::user_id.eq(user_id))
        .first::<Goal>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let mut newly_completed = false;

    if let Some(title) = update.title {
        goal.title = title;
    }
    if let Some(description) = update.description {
        goal.description = description;
    }
    if let Some(deadline) = update.deadline {
        goal.deadline = deadline;
    }
    if let Some(progress) = update.progress {
        goal.progress = Goal::clamp_progress(progress);
        if progress >= 100 && !goal.completed {
            goal.completed = true;
            newly_completed = true;
        }
    }
    if let Some(priority) = update.priority {
        goal.priority = priority;
    }
    if let Some(category) = update.category {
        goal.category = category;
    }
    if let Some(completed) = update.completed {
        goal.completed = completed;
    }
    goal.updated_at = Utc::now().naive_utc();

    diesel::update(goals::table.find(goal_id))
        .set((
            goals::title.eq(&goal.title),
            goals::description.eq(&goal.description),
            goals::deadline.eq(goal.deadline),
            goals::progress.eq(goal.progress),
            goals::priority.eq(goal.priority),
            goals::category.eq(goal.category),
            goals::completed.eq(goal.completed),
            goals::updated_at.eq(goal.updated_at),
        ))
        .execute(conn)?;

    if newly_completed {
        info!("Goal {} completed", goal_id);
    } else {
        info!("Updated goal {}", goal_id);
    }

    Ok(Some((goal, newly_completed)))
}

/// Deletes a goal, scoped to its owner
///
/// ### Returns
///
/// true if a goal was deleted, false if the user owns no such goal
#[instrument(skip(pool), fields(user_id = %user_id, goal_id = %goal_id))]
pub fn delete_goal(pool: &DbPool, user_id: &str, goal_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(
        goals::table
            .find(goal_id)
            .filter(goals::user_id.eq(user_id)),
    )
    .execute(conn)?;

    if deleted > 0 {
        info!("Deleted goal {}", goal_id);
    }

    Ok(deleted > 0)
}

/// Lists incomplete goals whose deadline falls within the next `days`
/// days (inclusive), soonest first
#[instrument(skip(pool), fields(user_id = %user_id, days = %days))]
pub fn list_upcoming_goals(pool: &DbPool, user_id: &str, days: i64) -> Result<Vec<Goal>> {
    let conn = &mut pool.get()?;

    let today = Utc::now().date_naive();
    let horizon = Duration::try_days(days)
        .and_then(|window| today.checked_add_signed(window))
        .unwrap_or(NaiveDate::MAX);

    let result = goals::table
        .filter(goals::user_id.eq(user_id))
        .filter(goals::completed.eq(false))
        .filter(goals::deadline.between(today, horizon))
        .order(goals::deadline.asc())
        .load::<Goal>(conn)?;

    Ok(result)
}

#[cfg(test)]
mod tests;
