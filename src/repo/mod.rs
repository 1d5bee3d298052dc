/// Repository module
///
/// This module provides the data access layer for the application.
/// It contains functions for interacting with the database, one submodule
/// per table, all scoped to the owning user.
///
/// The repository pattern abstracts away the details of database access
/// and provides a clean API for the rest of the application to use.

mod calendar_repo;
mod flashcard_repo;
mod goal_repo;
mod syllabus_repo;
mod test_repo;
mod timetable_repo;
mod user_repo;

// Re-export all repository functions
pub use calendar_repo::*;
pub use flashcard_repo::*;
pub use goal_repo::*;
pub use syllabus_repo::*;
pub use test_repo::*;
pub use timetable_repo::*;
pub use user_repo::*;
