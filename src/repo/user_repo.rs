use crate::db::DbPool;
use crate::dto::StatsUpdateDto;
use crate::models::User;
use crate::schema::{syllabus_items, users};
use crate::seed;
use crate::xp::{self, XpAward};
use anyhow::Result;
use chrono::Utc;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new user together with their starter syllabus
///
/// The user row and the seeded syllabus items are written in a single
/// transaction, so a failure part-way leaves no orphaned account.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `email` - The login email; must not already be registered
/// * `password_hash` - The already-hashed password
/// * `name` - The display name
///
/// ### Returns
///
/// A Result containing the newly created User if successful
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The email violates the unique constraint
/// - Any of the inserts fail
#[instrument(skip(pool, password_hash), fields(email = %email))]
pub fn create_user(pool: &DbPool, email: &str, password_hash: &str, name: &str) -> Result<User> {
    debug!("Creating new user with seeded syllabus");

    let conn = &mut pool.get()?;

    let user = conn.transaction::<User, anyhow::Error, _>(|conn| {
        let user = User::new(
            email.to_string(),
            password_hash.to_string(),
            name.to_string(),
        );

        diesel::insert_into(users::table)
            .values(&user)
            .execute(conn)?;

        let starter_topics = seed::initial_syllabus_items(&user.id);
        diesel::insert_into(syllabus_items::table)
            .values(&starter_topics)
            .execute(conn)?;

        Ok(user)
    })?;

    info!("Created user {} with starter syllabus", user.id);

    Ok(user)
}

/// Retrieves a user by their login email
#[instrument(skip(pool), fields(email = %email))]
pub fn get_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .filter(users::email.eq(email))
        .first::<User>(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a user by their ID
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn get_user(pool: &DbPool, user_id: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .find(user_id)
        .first::<User>(conn)
        .optional()?;

    Ok(result)
}

/// Updates a user's display name
///
/// ### Returns
///
/// The refreshed User, or None if no such user exists
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn update_profile_name(pool: &DbPool, user_id: &str, name: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let Some(mut user) = users::table.find(user_id).first::<User>(conn).optional()? else {
        return Ok(None);
    };

    user.name = name.to_string();

    diesel::update(users::table.find(user_id))
        .set(users::name.eq(&user.name))
        .execute(conn)?;

    info!("Updated profile name for user {}", user_id);

    Ok(Some(user))
}

/// Adds XP to a user's total and rederives their level
///
/// The stored level is always recomputed from the new total, so it cannot
/// drift no matter which action awarded the XP. Also refreshes the user's
/// last-active timestamp.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The user receiving the XP
/// * `amount` - The XP to add
///
/// ### Returns
///
/// The award outcome (new total, new level, whether a level boundary was
/// crossed), or None if no such user exists
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database update fails
#[instrument(skip(pool), fields(user_id = %user_id, amount = %amount))]
pub fn add_xp(pool: &DbPool, user_id: &str, amount: i32) -> Result<Option<XpAward>> {
    debug!("Adding XP");

    let conn = &mut pool.get()?;

    let Some(user) = users::table.find(user_id).first::<User>(conn).optional()? else {
        return Ok(None);
    };

    let award = xp::apply_xp(user.total_xp, amount);
    let now = Utc::now().naive_utc();

    diesel::update(users::table.find(user_id))
        .set((
            users::total_xp.eq(award.new_total_xp),
            users::level.eq(award.new_level),
            users::last_active_date.eq(now),
        ))
        .execute(conn)?;

    if award.leveled_up {
        info!(
            "User {} reached level {} ({} XP)",
            user_id, award.new_level, award.new_total_xp
        );
    }

    Ok(Some(award))
}

/// Applies a partial stats update to a user
///
/// Setting `totalXP` replaces the total and rederives the level. Raising
/// `currentStreak` above the stored longest streak raises the longest
/// streak with it. Any update refreshes the last-active timestamp.
///
/// ### Returns
///
/// The refreshed User, or None if no such user exists
#[instrument(skip(pool, update), fields(user_id = %user_id))]
pub fn update_stats(
    pool: &DbPool,
    user_id: &str,
    update: &StatsUpdateDto,
) -> Result<Option<User>> {
    debug!("Applying stats update");

    let conn = &mut pool.get()?;

    let Some(mut user) = users::table.find(user_id).first::<User>(conn).optional()? else {
        return Ok(None);
    };

    if let Some(total_xp) = update.total_xp {
        user.total_xp = total_xp;
        user.level = xp::level_for_xp(total_xp);
    }

    if let Some(current_streak) = update.current_streak {
        user.current_streak = current_streak;
        if current_streak > user.longest_streak {
            user.longest_streak = current_streak;
        }
    }

    if let Some(total_study_hours) = update.total_study_hours {
        user.total_study_hours = total_study_hours;
    }

    user.last_active_date = Utc::now().naive_utc();

    diesel::update(users::table.find(user_id))
        .set((
            users::total_xp.eq(user.total_xp),
            users::level.eq(user.level),
            users::current_streak.eq(user.current_streak),
            users::longest_streak.eq(user.longest_streak),
            users::total_study_hours.eq(user.total_study_hours),
            users::last_active_date.eq(user.last_active_date),
        ))
        .execute(conn)?;

    info!("Updated stats for user {}", user_id);

    Ok(Some(user))
}

/// Appends a badge to a user's earned set if they don't already hold it
///
/// ### Returns
///
/// Some(true) if the badge was newly awarded, Some(false) if the user had
/// already earned it, or None if no such user exists
#[instrument(skip(pool), fields(user_id = %user_id, badge = %badge_name))]
pub fn award_badge(pool: &DbPool, user_id: &str, badge_name: &str) -> Result<Option<bool>> {
    let conn = &mut pool.get()?;

    let Some(mut user) = users::table.find(user_id).first::<User>(conn).optional()? else {
        return Ok(None);
    };

    if user.badges.0.iter().any(|badge| badge == badge_name) {
        debug!("Badge already earned");
        return Ok(Some(false));
    }

    user.badges.0.push(badge_name.to_string());

    diesel::update(users::table.find(user_id))
        .set(users::badges.eq(&user.badges))
        .execute(conn)?;

    info!("Awarded badge '{}' to user {}", badge_name, user_id);

    Ok(Some(true))
}
