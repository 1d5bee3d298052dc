use serde::Serialize;

use crate::models::Priority;

/// XP width of a single level band.
pub const XP_PER_LEVEL: i32 = 500;

/// Derives the level for an XP total.
///
/// Levels are fixed 500-XP bands: 0-499 is level 1, 500-999 is level 2, and
/// so on. Negative totals clamp to level 1.
pub fn level_for_xp(total_xp: i32) -> i32 {
    total_xp.max(0) / XP_PER_LEVEL + 1
}

/// An action that earns XP.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XpEvent {
    FlashcardCreated,
    FlashcardReviewed { correct: bool },
    GoalCreated,
    GoalCompleted { priority: Priority },
    TopicMastered { high_yield: bool },
    TimetableTaskCompleted,
    TestCompleted { accuracy: f64 },
}

/// Returns the XP earned by an event.
///
/// ### Arguments
///
/// * `event` - The action being rewarded
///
/// ### Returns
///
/// The XP amount, always positive.
pub fn xp_for_event(event: XpEvent) -> i32 {
    match event {
        XpEvent::FlashcardCreated => 5,
        XpEvent::FlashcardReviewed { correct: true } => 3,
        XpEvent::FlashcardReviewed { correct: false } => 1,
        XpEvent::GoalCreated => 15,
        XpEvent::GoalCompleted { priority } => match priority {
            Priority::High => 50,
            Priority::Medium => 30,
            Priority::Low => 20,
        },
        XpEvent::TopicMastered { high_yield: true } => 25,
        XpEvent::TopicMastered { high_yield: false } => 15,
        XpEvent::TimetableTaskCompleted => 10,
        XpEvent::TestCompleted { accuracy } => test_completion_xp(accuracy),
    }
}

/// Accuracy-tiered test reward plus a flat completion bonus.
fn test_completion_xp(accuracy: f64) -> i32 {
    let base = if accuracy >= 90.0 {
        100
    } else if accuracy >= 80.0 {
        75
    } else if accuracy >= 70.0 {
        50
    } else {
        25
    };
    base + 25
}

/// Outcome of adding XP to a user's total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XpAward {
    pub amount: i32,
    pub new_total_xp: i32,
    pub new_level: i32,
    pub leveled_up: bool,
}

/// Adds an XP amount to a total and rederives the level.
///
/// ### Arguments
///
/// * `total_xp` - The user's XP total before the award
/// * `amount` - The XP being added
///
/// ### Returns
///
/// An [`XpAward`] with the new total, the new level, and whether a level
/// boundary was crossed.
pub fn apply_xp(total_xp: i32, amount: i32) -> XpAward {
    let new_total_xp = total_xp.saturating_add(amount).max(0);
    let new_level = level_for_xp(new_total_xp);
    XpAward {
        amount,
        new_total_xp,
        new_level,
        leveled_up: new_level > level_for_xp(total_xp),
    }
}

/// Level progress snapshot for a user.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub current_level: i32,
    #[serde(rename = "totalXP")]
    pub total_xp: i32,
    pub xp_for_current_level: i32,
    pub xp_for_next_level: i32,
    pub xp_progress_in_level: i32,
    pub xp_needed_for_next: i32,
    pub progress_percentage: f64,
}

/// Builds the level progress report for an XP total
///
/// ### Arguments
///
/// * `total_xp` - The user's current XP total
///
/// ### Returns
///
/// A [`LevelInfo`] describing where the total sits within its level band
pub fn level_info(total_xp: i32) -> LevelInfo {
    let current_level = level_for_xp(total_xp);
    let floor = (current_level - 1) * XP_PER_LEVEL;
    let ceiling = current_level * XP_PER_LEVEL;
    let in_level = total_xp.max(0) - floor;
    let percentage = in_level as f64 / XP_PER_LEVEL as f64 * 100.0;
    LevelInfo {
        current_level,
        total_xp,
        xp_for_current_level: floor,
        xp_for_next_level: ceiling,
        xp_progress_in_level: in_level,
        xp_needed_for_next: ceiling - total_xp.max(0),
        progress_percentage: (percentage * 10.0).round() / 10.0,
    }
}
