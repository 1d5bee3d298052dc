use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    DayOfWeek, Difficulty, EventType, ExamType, GoalCategory, Priority, SubjectScores,
    TopicStatus, User,
};

/// Data transfer object for registering a new account
///
/// This struct is used to deserialize JSON requests for registration.
#[derive(Deserialize, Debug)]
pub struct RegisterDto {
    /// The email address to register under, used as the login identifier
    pub email: String,

    /// The plaintext password, hashed before storage
    pub password: String,

    /// The display name of the new user
    pub name: String,
}

/// Data transfer object for logging in
///
/// This struct is used to deserialize JSON requests for login.
#[derive(Deserialize, Debug)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

/// Data transfer object for updating the authenticated user's profile
#[derive(Deserialize, Debug)]
pub struct UpdateProfileDto {
    /// The new display name, if it should change
    pub name: Option<String>,
}

/// The public view of a user account, embedded in auth responses
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "totalXP")]
    pub total_xp: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_study_hours: i32,
    pub level: i32,
    pub badges: Vec<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            total_xp: user.total_xp,
            current_streak: user.current_streak,
            longest_streak: user.longest_streak,
            total_study_hours: user.total_study_hours,
            level: user.level,
            badges: user.badges.0.clone(),
        }
    }
}

/// The response returned by register and login, carrying a bearer token
#[derive(Serialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserResponse,
}

impl TokenResponse {
    pub fn new(access_token: String, user: &User) -> Self {
        Self {
            access_token,
            token_type: "bearer",
            user: user.into(),
        }
    }
}

/// A plain confirmation message, used by delete and acknowledge endpoints
#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Data transfer object for creating a new flashcard
///
/// This struct is used to deserialize JSON requests for creating flashcards.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlashcardDto {
    pub subject: String,
    pub topic: String,
    pub question: String,
    pub answer: String,

    /// The difficulty tier, controlling the review ladder; defaults to medium
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// Data transfer object for editing an existing flashcard
///
/// All fields are optional; absent fields are left untouched.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFlashcardDto {
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub difficulty: Option<Difficulty>,
}

/// Data transfer object for recording a flashcard review outcome
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    /// Whether the card was answered correctly
    pub is_correct: bool,
}

/// Query parameters accepted by the flashcard list endpoint
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct FlashcardListQuery {
    pub subject: Option<String>,
    pub difficulty: Option<Difficulty>,
}

fn default_card_count() -> i64 {
    10
}

/// Query parameters accepted by the study session endpoint
#[derive(Deserialize, Debug)]
pub struct SessionQuery {
    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub difficulty: Option<Difficulty>,

    /// How many cards the assembled session should hold
    #[serde(default = "default_card_count")]
    pub card_count: i64,
}

impl Default for SessionQuery {
    fn default() -> Self {
        Self {
            subject: None,
            difficulty: None,
            card_count: default_card_count(),
        }
    }
}

/// Data transfer object for creating a new goal
///
/// This struct is used to deserialize JSON requests for creating goals.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalDto {
    pub title: String,
    pub description: String,

    /// The calendar date the goal is due
    pub deadline: NaiveDate,

    #[serde(default)]
    pub priority: Priority,

    pub category: GoalCategory,
}

/// Data transfer object for editing an existing goal
///
/// All fields are optional; absent fields are left untouched. Setting
/// `completed` to true triggers the completion XP award.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub progress: Option<i32>,
    pub priority: Option<Priority>,
    pub category: Option<GoalCategory>,
    pub completed: Option<bool>,
}

/// Query parameters accepted by the goal list endpoint
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct GoalListQuery {
    pub category: Option<GoalCategory>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

fn default_deadline_days() -> i64 {
    7
}

/// Query parameters accepted by the upcoming deadlines endpoint
#[derive(Deserialize, Debug)]
pub struct DeadlineQuery {
    /// How many days ahead to look for deadlines
    #[serde(default = "default_deadline_days")]
    pub days: i64,
}

impl Default for DeadlineQuery {
    fn default() -> Self {
        Self {
            days: default_deadline_days(),
        }
    }
}

/// Data transfer object for creating a new calendar event
///
/// This struct is used to deserialize JSON requests for creating events.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventDto {
    pub title: String,
    pub description: Option<String>,

    /// The calendar date of the event
    pub date: NaiveDate,

    /// An optional free-form time label, e.g. "09:00 AM"
    #[serde(rename = "time")]
    pub time_of_day: Option<String>,

    /// What kind of event this is (study session, exam, milestone)
    #[serde(rename = "type")]
    pub event_type: EventType,

    #[serde(default)]
    pub priority: Priority,
}

/// Query parameters accepted by the calendar event list endpoint
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct EventRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Data transfer object for recording a completed mock test
///
/// This struct is used to deserialize JSON requests for test results.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestDto {
    /// Which exam track the test belonged to
    #[serde(rename = "type")]
    pub exam_type: ExamType,

    /// Marks scored out of `total_marks`
    pub score: i32,

    pub total_marks: i32,

    /// Minutes spent on the test
    pub time_spent: i32,

    /// Per-subject marks breakdown
    pub subjects: SubjectScores,

    /// Topics the taker flagged as weak during this attempt
    #[serde(default)]
    pub weak_topics: Vec<String>,
}

fn default_test_limit() -> i64 {
    10
}

/// Query parameters accepted by the test result list endpoint
#[derive(Deserialize, Debug)]
pub struct TestListQuery {
    #[serde(default)]
    pub test_type: Option<ExamType>,

    /// Maximum number of results to return, newest first
    #[serde(default = "default_test_limit")]
    pub limit: i64,
}

impl Default for TestListQuery {
    fn default() -> Self {
        Self {
            test_type: None,
            limit: default_test_limit(),
        }
    }
}

/// Query parameter shared by analytics endpoints that filter on exam track
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct TestTypeQuery {
    pub test_type: Option<ExamType>,
}

/// Data transfer object for updating a syllabus topic's tracking state
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTopicDto {
    pub status: Option<TopicStatus>,
    pub high_yield: Option<bool>,
}

/// Query parameters accepted by the syllabus search endpoint
#[derive(Deserialize, Debug)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against topics and subtopics
    pub query: String,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub status: Option<TopicStatus>,

    #[serde(default)]
    pub high_yield: Option<bool>,
}

/// Data transfer object for creating a new timetable entry
///
/// This struct is used to deserialize JSON requests for timetable slots.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimetableDto {
    pub day: DayOfWeek,

    /// The slot label within the day, e.g. "06:00 AM"
    #[serde(rename = "time")]
    pub time_slot: String,

    pub subject: String,
    pub topic: String,
}

/// Data transfer object for editing an existing timetable entry
///
/// All fields are optional; absent fields are left untouched. Setting
/// `completed` to true triggers the task-completion XP award.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimetableDto {
    pub day: Option<DayOfWeek>,

    #[serde(rename = "time")]
    pub time_slot: Option<String>,

    pub subject: Option<String>,
    pub topic: Option<String>,
    pub completed: Option<bool>,
}

/// Query parameters accepted by the timetable list endpoint
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct TimetableListQuery {
    pub day: Option<DayOfWeek>,
}

/// Data transfer object for bulk-updating the authenticated user's stats
///
/// All fields are optional; absent fields are left untouched.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatsUpdateDto {
    #[serde(rename = "totalXP")]
    pub total_xp: Option<i32>,
    pub current_streak: Option<i32>,
    pub total_study_hours: Option<i32>,
}

impl StatsUpdateDto {
    /// Whether the payload carries no changes at all
    pub fn is_empty(&self) -> bool {
        self.total_xp.is_none() && self.current_streak.is_none() && self.total_study_hours.is_none()
    }
}

/// Data transfer object for granting XP directly
#[derive(Deserialize, Debug)]
pub struct AddXpDto {
    pub amount: i32,

    /// A short label describing what the XP was earned for
    #[serde(default)]
    pub reason: Option<String>,
}
