use crate::db::DbPool;
use crate::dto::{CreateEventDto, EventRangeQuery};
use crate::models::CalendarEvent;
use crate::schema::calendar_events;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new calendar event for a user
#[instrument(skip(pool, event), fields(user_id = %user_id, title = %event.title))]
pub fn create_event(pool: &DbPool, user_id: &str, event: CreateEventDto) -> Result<CalendarEvent> {
    debug!("Creating calendar event");

    let conn = &mut pool.get()?;

    let new_event = CalendarEvent::new(
        user_id,
        event.title,
        event.description,
        event.date,
        event.time_of_day,
        event.event_type,
        event.priority,
    );

    diesel::insert_into(calendar_events::table)
        .values(&new_event)
        .execute(conn)?;

    info!("Created calendar event {}", new_event.id);

    Ok(new_event)
}

/// Lists a user's calendar events in date order
///
/// Either end of the range may be omitted; present bounds are inclusive.
#[instrument(skip(pool, range), fields(user_id = %user_id))]
pub fn list_events(
    pool: &DbPool,
    user_id: &str,
    range: &EventRangeQuery,
) -> Result<Vec<CalendarEvent>> {
    let conn = &mut pool.get()?;

    let mut events = calendar_events::table
        .filter(calendar_events::user_id.eq(user_id))
        .into_boxed();

    if let Some(start_date) = range.start_date {
        events = events.filter(calendar_events::date.ge(start_date));
    }
    if let Some(end_date) = range.end_date {
        events = events.filter(calendar_events::date.le(end_date));
    }

    let result = events
        .order(calendar_events::date.asc())
        .load::<CalendarEvent>(conn)?;

    Ok(result)
}
