/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler is responsible for processing a specific type of HTTP request,
/// extracting the necessary data, calling the appropriate repository functions,
/// and returning a properly formatted response.

mod auth_handlers;
mod flashcard_handlers;
mod goal_handlers;
mod service_handlers;
mod syllabus_handlers;
mod test_handlers;
mod timetable_handlers;
mod user_handlers;

// Re-export all handlers
pub use auth_handlers::*;
pub use flashcard_handlers::*;
pub use goal_handlers::*;
pub use service_handlers::*;
pub use syllabus_handlers::*;
pub use test_handlers::*;
pub use timetable_handlers::*;
pub use user_handlers::*;
