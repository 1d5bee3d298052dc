use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::DayOfWeek;

/// One slot in the weekly study timetable
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::timetable_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    /// Unique identifier (UUID v4 as string)
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// Day of the week this slot repeats on
    pub day: DayOfWeek,

    /// Free-form slot label, e.g. "6:00-8:00"
    #[serde(rename = "time")]
    pub time_slot: String,

    pub subject: String,
    pub topic: String,

    /// Whether the task was done; flipping this to true awards XP once
    pub completed: bool,

    pub created_at: NaiveDateTime,
}

impl TimetableEntry {
    pub fn new(user_id: &str, day: DayOfWeek, time_slot: String, subject: String, topic: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            day,
            time_slot,
            subject,
            topic,
            completed: false,
            created_at: Utc::now().naive_utc(),
        }
    }
}
