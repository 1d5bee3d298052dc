use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ExamType, StringList, TopicStatus};

/// One syllabus topic a user is working through.
///
/// Seeded in bulk at registration from the fixed taxonomy; afterwards only
/// the status and high-yield flag change.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::syllabus_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SyllabusItem {
    /// Unique identifier (UUID v4 as string)
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// Exam track this topic belongs to
    #[serde(rename = "type")]
    pub exam_type: ExamType,

    /// Subject name (physics, chemistry, mathematics)
    pub subject: String,

    /// Topic name
    pub topic: String,

    /// Subtopic names, stored as a JSON array
    pub subtopics: StringList,

    /// Current study status
    pub status: TopicStatus,

    /// Whether this topic is historically high-importance for scoring
    pub high_yield: bool,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SyllabusItem {
    /// Creates a not-started topic for a user
    pub fn new(
        user_id: &str,
        exam_type: ExamType,
        subject: &str,
        topic: &str,
        subtopics: Vec<String>,
        high_yield: bool,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            exam_type,
            subject: subject.to_string(),
            topic: topic.to_string(),
            subtopics: subtopics.into(),
            status: TopicStatus::NotStarted,
            high_yield,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syllabus_item_new_is_not_started() {
        let item = SyllabusItem::new(
            "user-1",
            ExamType::Mains,
            "physics",
            "Mechanics",
            vec!["Kinematics".to_string(), "Dynamics".to_string()],
            true,
        );

        assert_eq!(item.status, TopicStatus::NotStarted);
        assert!(item.high_yield);
        assert_eq!(item.subtopics.0.len(), 2);
        assert!(Uuid::parse_str(&item.id).is_ok());
    }

    #[test]
    fn test_syllabus_item_serializes_exam_type_as_type() {
        let item = SyllabusItem::new("user-1", ExamType::Advanced, "chemistry", "Advanced Organic", vec![], true);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "advanced");
        assert_eq!(json["highYield"], true);
        assert_eq!(json["status"], "not-started");
    }
}
