use chrono::{Duration, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Difficulty;

/// A flashcard under spaced repetition.
///
/// New cards come due one day after creation; every review reschedules
/// `next_review` from the difficulty ladder.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::flashcards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    /// Unique identifier (UUID v4 as string)
    pub id: String,

    /// Owning user
    pub user_id: String,

    pub subject: String,
    pub topic: String,
    pub question: String,
    pub answer: String,

    /// Difficulty tier selecting the review-interval ladder
    pub difficulty: Difficulty,

    /// When this card was last reviewed, `None` until the first review
    pub last_reviewed: Option<NaiveDateTime>,

    /// When this card next comes due
    pub next_review: NaiveDateTime,

    /// Total reviews recorded
    pub review_count: i32,

    /// Reviews answered correctly
    pub correct_count: i32,

    pub created_at: NaiveDateTime,
}

impl Flashcard {
    /// Creates a new card, due one day from now
    pub fn new(
        user_id: &str,
        subject: String,
        topic: String,
        question: String,
        answer: String,
        difficulty: Difficulty,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            subject,
            topic,
            question,
            answer,
            difficulty,
            last_reviewed: None,
            next_review: now + Duration::days(1),
            review_count: 0,
            correct_count: 0,
            created_at: now,
        }
    }

    /// Lifetime answer accuracy as a percentage, rounded to 1 decimal;
    /// 0 when the card has never been reviewed
    pub fn accuracy(&self) -> f64 {
        if self.review_count > 0 {
            let pct = (self.correct_count as f64 / self.review_count as f64) * 100.0;
            (pct * 10.0).round() / 10.0
        } else {
            0.0
        }
    }
}
