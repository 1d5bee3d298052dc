use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::StringList;

/// Represents a registered user, the root aggregate every other record
/// belongs to
///
/// The stored `level` is always rederived from `total_xp` whenever XP
/// changes, so it never drifts from `floor(total_xp / 500) + 1`.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (UUID v4 as string)
    pub id: String,

    /// Login email, unique across users
    pub email: String,

    /// Argon2 hash of the password, never serialized
    #[serde(skip)]
    pub password_hash: String,

    /// Display name
    pub name: String,

    /// Lifetime experience points
    #[serde(rename = "totalXP")]
    pub total_xp: i32,

    /// Consecutive study days, maintained by the client via stats updates
    pub current_streak: i32,

    /// Longest streak ever reached; only ever increases
    pub longest_streak: i32,

    /// Total hours studied, maintained by the client via stats updates
    pub total_study_hours: i32,

    /// Derived tier, `floor(total_xp / 500) + 1`
    pub level: i32,

    /// Earned badge names, unique, stored as a JSON array
    pub badges: StringList,

    /// When this user registered
    pub created_at: NaiveDateTime,

    /// Last time an XP award or stats update touched this user
    pub last_active_date: NaiveDateTime,
}

impl User {
    /// Creates a new user with zeroed progress and level 1
    ///
    /// ### Arguments
    ///
    /// * `email` - The login email
    /// * `password_hash` - The already-hashed password
    /// * `name` - The display name
    pub fn new(email: String, password_hash: String, name: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            name,
            total_xp: 0,
            current_streak: 0,
            longest_streak: 0,
            total_study_hours: 0,
            level: 1,
            badges: StringList::default(),
            created_at: now,
            last_active_date: now,
        }
    }
}
