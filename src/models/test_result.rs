use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ExamType, StringList, SubjectScores};

/// The recorded outcome of one practice or mock test.
///
/// `accuracy` is derived from score and total marks at construction and
/// stored rounded to 2 decimals.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::test_results)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Unique identifier (UUID v4 as string)
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// Exam track the test simulated
    #[serde(rename = "type")]
    pub exam_type: ExamType,

    /// When the test was taken
    pub date: NaiveDateTime,

    /// Marks scored
    pub score: i32,

    /// Marks available
    pub total_marks: i32,

    /// `score / total_marks * 100`, rounded to 2 decimals
    pub accuracy: f64,

    /// Minutes spent
    pub time_spent: i32,

    /// Per-subject breakdown, stored as a JSON object
    pub subjects: SubjectScores,

    /// Topics the user marked as weak in this test, stored as a JSON array
    pub weak_topics: StringList,

    pub created_at: NaiveDateTime,
}

impl TestResult {
    /// Records a test taken now, deriving accuracy from the marks
    pub fn new(
        user_id: &str,
        exam_type: ExamType,
        score: i32,
        total_marks: i32,
        time_spent: i32,
        subjects: SubjectScores,
        weak_topics: Vec<String>,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            exam_type,
            date: now,
            score,
            total_marks,
            accuracy: Self::derive_accuracy(score, total_marks),
            time_spent,
            subjects,
            weak_topics: weak_topics.into(),
            created_at: now,
        }
    }

    /// Percentage scored, rounded to 2 decimals; 0 when no marks were
    /// available
    pub fn derive_accuracy(score: i32, total_marks: i32) -> f64 {
        if total_marks == 0 {
            return 0.0;
        }
        let pct = (score as f64 / total_marks as f64) * 100.0;
        (pct * 100.0).round() / 100.0
    }

    /// Unrounded percentage scored, for aggregate statistics
    pub fn percentage(&self) -> f64 {
        if self.total_marks == 0 {
            return 0.0;
        }
        (self.score as f64 / self.total_marks as f64) * 100.0
    }
}
