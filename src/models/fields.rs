use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use diesel::deserialize::{FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize;
use diesel::serialize::{IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use serde::{Deserialize, Serialize, de};

/// The two exam stages a syllabus topic or test result belongs to.
///
/// Parsing is strict: anything other than `mains` or `advanced` is rejected,
/// so an unsupported track string never reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum ExamType {
    Mains,
    Advanced,
}

impl ExamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamType::Mains => "mains",
            ExamType::Advanced => "advanced",
        }
    }

    /// Parses an exam track string, `None` for anything unrecognized
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mains" => Some(ExamType::Mains),
            "advanced" => Some(ExamType::Advanced),
            _ => None,
        }
    }
}

impl FromSql<Text, Sqlite> for ExamType {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        ExamType::parse(&text).ok_or_else(|| format!("unrecognized exam type: {text}").into())
    }
}

impl ToSql<Text, Sqlite> for ExamType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str().to_owned());
        Ok(IsNull::No)
    }
}

/// Flashcard difficulty tier, selecting the review-interval ladder.
///
/// Unknown difficulty strings resolve to `Medium` at the boundary (both when
/// deserializing requests and when reading stored rows), so downstream code
/// never has to handle an unrecognized tier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Hard,
    #[default]
    #[serde(other)]
    Medium,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromSql<Text, Sqlite> for Difficulty {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        Ok(match text.as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        })
    }
}

impl ToSql<Text, Sqlite> for Difficulty {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str().to_owned());
        Ok(IsNull::No)
    }
}

/// Study status of a syllabus topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "kebab-case")]
pub enum TopicStatus {
    NotStarted,
    InProgress,
    Weak,
    ReviseSoon,
    Mastered,
}

impl TopicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicStatus::NotStarted => "not-started",
            TopicStatus::InProgress => "in-progress",
            TopicStatus::Weak => "weak",
            TopicStatus::ReviseSoon => "revise-soon",
            TopicStatus::Mastered => "mastered",
        }
    }
}

impl FromSql<Text, Sqlite> for TopicStatus {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        match text.as_str() {
            "not-started" => Ok(TopicStatus::NotStarted),
            "in-progress" => Ok(TopicStatus::InProgress),
            "weak" => Ok(TopicStatus::Weak),
            "revise-soon" => Ok(TopicStatus::ReviseSoon),
            "mastered" => Ok(TopicStatus::Mastered),
            _ => Err(format!("unrecognized topic status: {text}").into()),
        }
    }
}

impl ToSql<Text, Sqlite> for TopicStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str().to_owned());
        Ok(IsNull::No)
    }
}

/// Priority of a goal or calendar event, also the key for goal-completion XP
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl FromSql<Text, Sqlite> for Priority {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        match text.as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("unrecognized priority: {text}").into()),
        }
    }
}

impl ToSql<Text, Sqlite> for Priority {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str().to_owned());
        Ok(IsNull::No)
    }
}

/// Category a goal counts toward in the stats breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    Syllabus,
    Performance,
    Routine,
}

impl GoalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalCategory::Syllabus => "syllabus",
            GoalCategory::Performance => "performance",
            GoalCategory::Routine => "routine",
        }
    }
}

impl FromSql<Text, Sqlite> for GoalCategory {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        match text.as_str() {
            "syllabus" => Ok(GoalCategory::Syllabus),
            "performance" => Ok(GoalCategory::Performance),
            "routine" => Ok(GoalCategory::Routine),
            _ => Err(format!("unrecognized goal category: {text}").into()),
        }
    }
}

impl ToSql<Text, Sqlite> for GoalCategory {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str().to_owned());
        Ok(IsNull::No)
    }
}

/// Kind of calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Test,
    Study,
    Revision,
    Practice,
    Milestone,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Test => "test",
            EventType::Study => "study",
            EventType::Revision => "revision",
            EventType::Practice => "practice",
            EventType::Milestone => "milestone",
        }
    }
}

impl FromSql<Text, Sqlite> for EventType {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        match text.as_str() {
            "test" => Ok(EventType::Test),
            "study" => Ok(EventType::Study),
            "revision" => Ok(EventType::Revision),
            "practice" => Ok(EventType::Practice),
            "milestone" => Ok(EventType::Milestone),
            _ => Err(format!("unrecognized event type: {text}").into()),
        }
    }
}

impl ToSql<Text, Sqlite> for EventType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str().to_owned());
        Ok(IsNull::No)
    }
}

/// Day of the week a timetable entry is scheduled on, stored lowercase.
///
/// Deserialization folds case so `"Monday"` and `"monday"` are the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    /// Parses a day name, folding case; `None` for anything unrecognized
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monday" => Some(DayOfWeek::Monday),
            "tuesday" => Some(DayOfWeek::Tuesday),
            "wednesday" => Some(DayOfWeek::Wednesday),
            "thursday" => Some(DayOfWeek::Thursday),
            "friday" => Some(DayOfWeek::Friday),
            "saturday" => Some(DayOfWeek::Saturday),
            "sunday" => Some(DayOfWeek::Sunday),
            _ => None,
        }
    }

    /// All seven days, Monday first
    pub fn all() -> [DayOfWeek; 7] {
        [
            DayOfWeek::Monday,
            DayOfWeek::Tuesday,
            DayOfWeek::Wednesday,
            DayOfWeek::Thursday,
            DayOfWeek::Friday,
            DayOfWeek::Saturday,
            DayOfWeek::Sunday,
        ]
    }

    /// Position in the Monday-first week, for ordering timetable entries
    pub fn index(&self) -> usize {
        match self {
            DayOfWeek::Monday => 0,
            DayOfWeek::Tuesday => 1,
            DayOfWeek::Wednesday => 2,
            DayOfWeek::Thursday => 3,
            DayOfWeek::Friday => 4,
            DayOfWeek::Saturday => 5,
            DayOfWeek::Sunday => 6,
        }
    }

    /// The day of week for the given UTC instant
    pub fn on(now: DateTime<Utc>) -> Self {
        Self::all()[now.weekday().num_days_from_monday() as usize]
    }
}

impl<'de> Deserialize<'de> for DayOfWeek {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        DayOfWeek::parse(&text)
            .ok_or_else(|| de::Error::custom(format!("unrecognized day: {text}")))
    }
}

impl FromSql<Text, Sqlite> for DayOfWeek {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        DayOfWeek::parse(&text).ok_or_else(|| format!("unrecognized day: {text}").into())
    }
}

impl ToSql<Text, Sqlite> for DayOfWeek {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str().to_owned());
        Ok(IsNull::No)
    }
}

/// A list of strings stored as a JSON array in a TEXT column
/// (badge names, syllabus subtopics, weak-topic names)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

impl From<Vec<String>> for StringList {
    fn from(items: Vec<String>) -> Self {
        StringList(items)
    }
}

impl FromSql<Text, Sqlite> for StringList {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        let items = serde_json::from_str(&text)?;
        Ok(StringList(items))
    }
}

impl ToSql<Text, Sqlite> for StringList {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(serde_json::to_string(&self.0)?);
        Ok(IsNull::No)
    }
}

/// Marks obtained in one subject of a test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub score: i32,
    pub total: i32,
    pub accuracy: f64,
}

/// Per-subject score breakdown of a test, stored as a JSON object in a TEXT
/// column keyed by subject name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(transparent)]
pub struct SubjectScores(pub HashMap<String, SubjectScore>);

impl FromSql<Text, Sqlite> for SubjectScores {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        let scores = serde_json::from_str(&text)?;
        Ok(SubjectScores(scores))
    }
}

impl ToSql<Text, Sqlite> for SubjectScores {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(serde_json::to_string(&self.0)?);
        Ok(IsNull::No)
    }
}
