use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{GoalCategory, Priority};

/// A study goal with a deadline and 0-100 progress.
///
/// Progress is clamped to [0, 100] on every update; the first time it
/// reaches 100 the goal is marked completed and XP is awarded.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Unique identifier (UUID v4 as string)
    pub id: String,

    /// Owning user
    pub user_id: String,

    pub title: String,
    pub description: String,

    /// Date this goal should be done by
    pub deadline: NaiveDate,

    /// Completion percentage, always within [0, 100]
    pub progress: i32,

    pub priority: Priority,
    pub category: GoalCategory,

    /// Set once progress first reaches 100 (or explicitly by the client)
    pub completed: bool,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Goal {
    /// Creates a new goal at 0% progress
    pub fn new(
        user_id: &str,
        title: String,
        description: String,
        deadline: NaiveDate,
        priority: Priority,
        category: GoalCategory,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title,
            description,
            deadline,
            progress: 0,
            priority,
            category,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Clamps a requested progress value into the valid [0, 100] range
    pub fn clamp_progress(progress: i32) -> i32 {
        progress.clamp(0, 100)
    }
}
