/// Data models module
///
/// This module defines the core data structures used throughout the application.
/// It includes database models that map to database tables, the closed
/// vocabularies (exam track, difficulty, status, priority, ...) stored as TEXT
/// columns, and methods for creating and manipulating these models.

// Re-export all model types
mod fields;
pub use fields::{
    DayOfWeek, Difficulty, EventType, ExamType, GoalCategory, Priority, StringList, SubjectScore,
    SubjectScores, TopicStatus,
};

mod user;
pub use user::User;

mod syllabus_item;
pub use syllabus_item::SyllabusItem;

mod flashcard;
pub use flashcard::Flashcard;

mod goal;
pub use goal::Goal;

mod calendar_event;
pub use calendar_event::CalendarEvent;

mod test_result;
pub use test_result::TestResult;

mod timetable_entry;
pub use timetable_entry::TimetableEntry;
