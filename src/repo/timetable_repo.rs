use crate::db::DbPool;
use crate::dto::{CreateTimetableDto, UpdateTimetableDto};
use crate::models::{DayOfWeek, TimetableEntry};
use crate::schema::timetable_entries;
use anyhow::Result;
use chrono::Utc;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new timetable entry for a user
#[instrument(skip(pool, entry), fields(user_id = %user_id, day = ?entry.day))]
pub fn create_timetable_entry(
    pool: &DbPool,
    user_id: &str,
    entry: CreateTimetableDto,
) -> Result<TimetableEntry> {
    debug!("Creating timetable entry");

    let conn = &mut pool.get()?;

    let new_entry = TimetableEntry::new(
        user_id,
        entry.day,
        entry.time_slot,
        entry.subject,
        entry.topic,
    );

    diesel::insert_into(timetable_entries::table)
        .values(&new_entry)
        .execute(conn)?;

    info!("Created timetable entry {}", new_entry.id);

    Ok(new_entry)
}

/// Lists a user's timetable, ordered Monday-first and by time slot within
/// each day
///
/// The day column stores lowercase names, so the weekday ordering is
/// applied here rather than in SQL.
#[instrument(skip(pool), fields(user_id = %user_id, day = ?day))]
pub fn list_timetable(
    pool: &DbPool,
    user_id: &str,
    day: Option<DayOfWeek>,
) -> Result<Vec<TimetableEntry>> {
    let conn = &mut pool.get()?;

    let mut entries = timetable_entries::table
        .filter(timetable_entries::user_id.eq(user_id))
        .into_boxed();

    if let Some(day) = day {
        entries = entries.filter(timetable_entries::day.eq(day));
    }

    let mut result = entries.load::<TimetableEntry>(conn)?;
    result.sort_by(|a, b| {
        (a.day.index(), &a.time_slot).cmp(&(b.day.index(), &b.time_slot))
    });

    Ok(result)
}

/// Retrieves one timetable entry, scoped to its owner
#[instrument(skip(pool), fields(user_id = %user_id, entry_id = %entry_id))]
pub fn get_timetable_entry(
    pool: &DbPool,
    user_id: &str,
    entry_id: &str,
) -> Result<Option<TimetableEntry>> {
    let conn = &mut pool.get()?;

    let result = timetable_entries::table
        .find(entry_id)
        .filter(timetable_entries::user_id.eq(user_id))
        .first::<TimetableEntry>(conn)
        .optional()?;

    Ok(result)
}

/// Applies a partial update to a timetable entry
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The entry's owner
/// * `entry_id` - The entry to update
/// * `update` - The fields to change
///
/// ### Returns
///
/// The refreshed entry and whether this update freshly completed it
/// (a false-to-true transition, which earns XP), or None if the user owns
/// no such entry
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database update fails
#[instrument(skip(pool, update), fields(user_id = %user_id, entry_id = %entry_id))]
pub fn update_timetable_entry(
    pool: &DbPool,
    user_id: &str,
    entry_id: &str,
    update: UpdateTimetableDto,
) -> Result<Option<(TimetableEntry, bool)>> {
    debug!("Updating timetable entry");

    let conn = &mut pool.get()?;

    let Some(mut entry) = timetable_entries::table
        .find(entry_id)
        .filter(timetable_entries::user_id.eq(user_id))
        .first::<TimetableEntry>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let newly_completed = update.completed == Some(true) && !entry.completed;

    if let Some(day) = update.day {
        entry.day = day;
    }
    if let Some(time_slot) = update.time_slot {
        entry.time_slot = time_slot;
    }
    if let Some(subject) = update.subject {
        entry.subject = subject;
    }
    if let Some(topic) = update.topic {
        entry.topic = topic;
    }
    if let Some(completed) = update.completed {
        entry.completed = completed;
    }

    diesel::update(timetable_entries::table.find(entry_id))
        .set((
            timetable_entries::day.eq(entry.day),
            timetable_entries::time_slot.eq(&entry.time_slot),
            timetable_entries::subject.eq(&entry.subject),
            timetable_entries::topic.eq(&entry.topic),
            timetable_entries::completed.eq(entry.completed),
        ))
        .execute(conn)?;

    if newly_completed {
        info!("Timetable entry {} completed", entry_id);
    } else {
        info!("Updated timetable entry {}", entry_id);
    }

    Ok(Some((entry, newly_completed)))
}

/// Deletes a timetable entry, scoped to its owner
///
/// ### Returns
///
/// true if an entry was deleted, false if the user owns no such entry
#[instrument(skip(pool), fields(user_id = %user_id, entry_id = %entry_id))]
pub fn delete_timetable_entry(pool: &DbPool, user_id: &str, entry_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(
        timetable_entries::table
            .find(entry_id)
            .filter(timetable_entries::user_id.eq(user_id)),
    )
    .execute(conn)?;

    if deleted > 0 {
        info!("Deleted timetable entry {}", entry_id);
    }

    Ok(deleted > 0)
}

/// Lists the entries scheduled for the current UTC weekday, by time slot
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn list_today(pool: &DbPool, user_id: &str) -> Result<Vec<TimetableEntry>> {
    let today = DayOfWeek::on(Utc::now());
    debug!("Listing timetable for {}", today.as_str());

    let conn = &mut pool.get()?;

    let mut result = timetable_entries::table
        .filter(timetable_entries::user_id.eq(user_id))
        .filter(timetable_entries::day.eq(today))
        .load::<TimetableEntry>(conn)?;
    result.sort_by(|a, b| a.time_slot.cmp(&b.time_slot));

    Ok(result)
}
