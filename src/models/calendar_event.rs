use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{EventType, Priority};

/// A dated entry on the study calendar (scheduled test, revision block,
/// milestone, ...)
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::calendar_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Unique identifier (UUID v4 as string)
    pub id: String,

    /// Owning user
    pub user_id: String,

    pub title: String,
    pub description: Option<String>,

    /// Day the event falls on
    pub date: NaiveDate,

    /// Optional free-form time of day, e.g. "18:00" or "morning"
    #[serde(rename = "time")]
    pub time_of_day: Option<String>,

    #[serde(rename = "type")]
    pub event_type: EventType,

    pub priority: Priority,
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

impl CalendarEvent {
    pub fn new(
        user_id: &str,
        title: String,
        description: Option<String>,
        date: NaiveDate,
        time_of_day: Option<String>,
        event_type: EventType,
        priority: Priority,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title,
            description,
            date,
            time_of_day,
            event_type,
            priority,
            completed: false,
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_event_wire_format() {
        let event = CalendarEvent::new(
            "user-1",
            "Mock test".to_string(),
            None,
            NaiveDate::from_ymd_opt(2025, 9, 14).unwrap(),
            Some("09:00".to_string()),
            EventType::Test,
            Priority::High,
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "test");
        assert_eq!(json["time"], "09:00");
        assert_eq!(json["date"], "2025-09-14");
        assert_eq!(json["completed"], false);
    }
}
