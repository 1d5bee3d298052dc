use chrono::{DateTime, Duration, Utc};

use crate::models::Difficulty;

/// Review-interval ladders in days, one per difficulty tier.
///
/// A card climbs its ladder one rung per correct review; once past the top
/// rung the interval doubles per review. An incorrect review always drops
/// back to a 1-day interval.
const EASY_LADDER: [i64; 5] = [1, 3, 7, 14, 30];
const MEDIUM_LADDER: [i64; 5] = [1, 2, 5, 10, 21];
const HARD_LADDER: [i64; 5] = [1, 1, 3, 7, 14];

fn ladder(difficulty: Difficulty) -> &'static [i64] {
    match difficulty {
        Difficulty::Easy => &EASY_LADDER,
        Difficulty::Medium => &MEDIUM_LADDER,
        Difficulty::Hard => &HARD_LADDER,
    }
}

/// Computes the next review interval in days.
///
/// `review_count` is the card's review count *after* the current review has
/// been counted, and indexes the ladder directly: a card on its first review
/// (count 1) that answers correctly lands on rung 1 of its ladder.
///
/// ### Arguments
///
/// * `difficulty` - The card's difficulty tier
/// * `is_correct` - Whether the latest review was answered correctly
/// * `review_count` - Total reviews recorded, including the latest
///
/// ### Returns
///
/// The number of days until the card comes due again, always at least 1.
/// Saturates instead of overflowing for absurdly large review counts.
pub fn interval_days(difficulty: Difficulty, is_correct: bool, review_count: i32) -> i64 {
    if !is_correct {
        // Reset to the beginning on a miss
        return 1;
    }

    let rungs = ladder(difficulty);
    let count = review_count.max(0) as usize;

    if count < rungs.len() {
        rungs[count]
    } else {
        // Past the ladder the top rung doubles per review
        let exponent = (count - rungs.len() + 1) as u32;
        rungs[rungs.len() - 1].saturating_mul(2_i64.saturating_pow(exponent))
    }
}

/// Computes the next review timestamp from a given instant.
///
/// Clamps to the maximum representable timestamp rather than overflowing,
/// which only matters for review counts far past anything a user can reach.
pub fn next_review_at(
    now: DateTime<Utc>,
    difficulty: Difficulty,
    is_correct: bool,
    review_count: i32,
) -> DateTime<Utc> {
    let days = interval_days(difficulty, is_correct, review_count);
    Duration::try_days(days)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Computes the next review timestamp from the current UTC time
///
/// ### Arguments
///
/// * `difficulty` - The card's difficulty tier
/// * `is_correct` - Whether the latest review was answered correctly
/// * `review_count` - Total reviews recorded, including the latest
///
/// ### Returns
///
/// The UTC instant the card next comes due
pub fn next_review(difficulty: Difficulty, is_correct: bool, review_count: i32) -> DateTime<Utc> {
    next_review_at(Utc::now(), difficulty, is_correct, review_count)
}
