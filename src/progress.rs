//! Pure aggregation over a user's records. Every function here takes a
//! slice of already-loaded rows and computes a report without touching the
//! database, so the handlers stay thin and the arithmetic stays testable.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{
    DayOfWeek, Flashcard, Goal, SyllabusItem, TestResult, TimetableEntry, TopicStatus,
};

/// The three seed subjects every account starts with.
pub const SUBJECTS: [&str; 3] = ["physics", "chemistry", "mathematics"];

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage with a zero-denominator guard.
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

// ============================================================================
// Syllabus
// ============================================================================

/// Per-subject slice of the overall syllabus report.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubjectProgress {
    pub subject: String,
    pub total_topics: usize,
    pub completed_topics: usize,
    pub in_progress_topics: usize,
    pub mastered_topics: usize,
    pub weak_topics: usize,
    pub high_yield_topics: usize,
    pub progress_percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverallProgress {
    pub total_topics: usize,
    pub completed_topics: usize,
    pub progress_percentage: f64,
    pub subject_progress: Vec<SubjectProgress>,
}

/// Single-subject progress report.
///
/// Unlike [`SubjectProgress`] this omits the mastered count; completed and
/// mastered are the same thing for a single subject and the report only
/// carries one of them.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubjectReport {
    pub subject: String,
    pub total_topics: usize,
    pub completed_topics: usize,
    pub in_progress_topics: usize,
    pub weak_topics: usize,
    pub high_yield_topics: usize,
    pub progress_percentage: f64,
}

/// Aggregates syllabus items into the overall progress report.
///
/// A topic counts as completed once its status reaches mastered. Subjects
/// appear in first-seen order.
pub fn syllabus_progress(items: &[SyllabusItem]) -> OverallProgress {
    let total_topics = items.len();
    let completed_topics = items
        .iter()
        .filter(|item| item.status == TopicStatus::Mastered)
        .count();

    let mut subjects: Vec<SubjectProgress> = Vec::new();
    for item in items {
        let entry = match subjects.iter_mut().find(|s| s.subject == item.subject) {
            Some(entry) => entry,
            None => {
                subjects.push(SubjectProgress {
                    subject: item.subject.clone(),
                    total_topics: 0,
                    completed_topics: 0,
                    in_progress_topics: 0,
                    mastered_topics: 0,
                    weak_topics: 0,
                    high_yield_topics: 0,
                    progress_percentage: 0.0,
                });
                subjects.last_mut().unwrap()
            }
        };

        entry.total_topics += 1;
        match item.status {
            TopicStatus::Mastered => {
                entry.completed_topics += 1;
                entry.mastered_topics += 1;
            }
            TopicStatus::InProgress => entry.in_progress_topics += 1,
            TopicStatus::Weak => entry.weak_topics += 1,
            _ => {}
        }
        if item.high_yield {
            entry.high_yield_topics += 1;
        }
    }

    for entry in &mut subjects {
        entry.progress_percentage = round1(percentage(entry.completed_topics, entry.total_topics));
    }

    OverallProgress {
        total_topics,
        completed_topics,
        progress_percentage: round1(percentage(completed_topics, total_topics)),
        subject_progress: subjects,
    }
}

/// Builds the report for one subject. The slice must already be filtered to
/// that subject's items.
pub fn subject_progress(subject: &str, items: &[SyllabusItem]) -> SubjectReport {
    let total = items.len();
    let completed = items
        .iter()
        .filter(|item| item.status == TopicStatus::Mastered)
        .count();
    let in_progress = items
        .iter()
        .filter(|item| item.status == TopicStatus::InProgress)
        .count();
    let weak = items
        .iter()
        .filter(|item| item.status == TopicStatus::Weak)
        .count();
    let high_yield = items.iter().filter(|item| item.high_yield).count();

    SubjectReport {
        subject: subject.to_string(),
        total_topics: total,
        completed_topics: completed,
        in_progress_topics: in_progress,
        weak_topics: weak,
        high_yield_topics: high_yield,
        progress_percentage: round1(percentage(completed, total)),
    }
}

// ============================================================================
// Flashcards
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardStats {
    pub total_cards: usize,
    pub cards_due: usize,
    pub average_accuracy: f64,
    pub total_reviews: i32,
    pub subject_distribution: HashMap<String, usize>,
    pub difficulty_distribution: HashMap<String, usize>,
}

/// Summarizes a user's flashcard collection.
///
/// Average accuracy pools every review across every card, so a card with
/// many reviews weighs more than a fresh one.
pub fn flashcard_stats(cards: &[Flashcard], now: NaiveDateTime) -> FlashcardStats {
    let total_cards = cards.len();
    let cards_due = cards.iter().filter(|card| card.next_review <= now).count();

    let total_reviews: i32 = cards.iter().map(|card| card.review_count).sum();
    let total_correct: i32 = cards.iter().map(|card| card.correct_count).sum();
    let average_accuracy = if total_reviews > 0 {
        round1(total_correct as f64 / total_reviews as f64 * 100.0)
    } else {
        0.0
    };

    let mut subject_distribution: HashMap<String, usize> = HashMap::new();
    let mut difficulty_distribution: HashMap<String, usize> = HashMap::new();
    for card in cards {
        *subject_distribution.entry(card.subject.clone()).or_insert(0) += 1;
        *difficulty_distribution
            .entry(card.difficulty.as_str().to_string())
            .or_insert(0) += 1;
    }

    FlashcardStats {
        total_cards,
        cards_due,
        average_accuracy,
        total_reviews,
        subject_distribution,
        difficulty_distribution,
    }
}

// ============================================================================
// Goals
// ============================================================================

/// A {total, completed} pair used by several breakdown maps.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct CompletionCount {
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalStats {
    pub total_goals: usize,
    pub completed_goals: usize,
    pub average_progress: f64,
    pub category_distribution: HashMap<String, CompletionCount>,
    pub priority_distribution: HashMap<String, CompletionCount>,
    pub completion_rate: f64,
}

pub fn goal_stats(goals: &[Goal]) -> GoalStats {
    let total_goals = goals.len();
    let completed_goals = goals.iter().filter(|goal| goal.completed).count();

    let average_progress = if total_goals > 0 {
        let total_progress: i32 = goals.iter().map(|goal| goal.progress).sum();
        round1(total_progress as f64 / total_goals as f64)
    } else {
        0.0
    };

    let mut category_distribution: HashMap<String, CompletionCount> = HashMap::new();
    let mut priority_distribution: HashMap<String, CompletionCount> = HashMap::new();
    for goal in goals {
        let by_category = category_distribution
            .entry(goal.category.as_str().to_string())
            .or_default();
        by_category.total += 1;
        if goal.completed {
            by_category.completed += 1;
        }

        let by_priority = priority_distribution
            .entry(goal.priority.as_str().to_string())
            .or_default();
        by_priority.total += 1;
        if goal.completed {
            by_priority.completed += 1;
        }
    }

    GoalStats {
        total_goals,
        completed_goals,
        average_progress,
        category_distribution,
        priority_distribution,
        completion_rate: round1(percentage(completed_goals, total_goals)),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct TrendReport {
    pub score: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeakTopicCount {
    pub topic: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SubjectPerformance {
    pub average: f64,
    pub best: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestAnalytics {
    pub average_score: f64,
    pub total_tests: usize,
    pub best_score: f64,
    pub average_time: i32,
    pub recent_tests: Vec<TestResult>,
    pub weak_topics: Vec<WeakTopicCount>,
    pub subject_performance: HashMap<String, SubjectPerformance>,
    pub trend: TrendReport,
}

/// Computes performance analytics over a test history.
///
/// The slice must be sorted most-recent-first; the trend windows and the
/// recent-tests echo depend on that ordering.
///
/// The trend compares the mean of the two most recent tests against the mean
/// of the next up-to-two. With fewer than four tests the previous window
/// shrinks to whatever remains, and with nothing remaining it contributes 0.
pub fn test_analytics(tests: &[TestResult]) -> TestAnalytics {
    let total_tests = tests.len();
    if total_tests == 0 {
        return TestAnalytics {
            average_score: 0.0,
            total_tests: 0,
            best_score: 0.0,
            average_time: 0,
            recent_tests: Vec::new(),
            weak_topics: Vec::new(),
            subject_performance: HashMap::new(),
            trend: TrendReport::default(),
        };
    }

    let total_score: f64 = tests.iter().map(|test| test.percentage()).sum();
    let average_score = round2(total_score / total_tests as f64);
    let best_score = round2(
        tests
            .iter()
            .map(|test| test.percentage())
            .fold(0.0, f64::max),
    );
    let average_time = tests.iter().map(|test| test.time_spent).sum::<i32>() / total_tests as i32;

    let recent_tests: Vec<TestResult> = tests.iter().take(5).cloned().collect();

    // Frequency table in first-seen order, then a stable sort by count so
    // equal counts stay in that order
    let mut weak_topics: Vec<WeakTopicCount> = Vec::new();
    for test in tests {
        for topic in &test.weak_topics.0 {
            match weak_topics.iter_mut().find(|w| &w.topic == topic) {
                Some(entry) => entry.count += 1,
                None => weak_topics.push(WeakTopicCount {
                    topic: topic.clone(),
                    count: 1,
                }),
            }
        }
    }
    weak_topics.sort_by(|a, b| b.count.cmp(&a.count));

    let mut subject_performance: HashMap<String, SubjectPerformance> = HashMap::new();
    for subject in SUBJECTS {
        let scores: Vec<f64> = tests
            .iter()
            .filter_map(|test| test.subjects.0.get(subject))
            .map(|entry| entry.accuracy)
            .collect();
        if !scores.is_empty() {
            subject_performance.insert(
                subject.to_string(),
                SubjectPerformance {
                    average: round2(scores.iter().sum::<f64>() / scores.len() as f64),
                    best: scores.iter().copied().fold(0.0, f64::max),
                    count: scores.len(),
                },
            );
        }
    }

    let mut trend = TrendReport::default();
    if total_tests >= 2 {
        let recent_score = (tests[0].percentage() + tests[1].percentage()) / 2.0;
        let recent_accuracy = (tests[0].accuracy + tests[1].accuracy) / 2.0;

        let previous = &tests[2..total_tests.min(4)];
        let (previous_score, previous_accuracy) = if previous.is_empty() {
            (0.0, 0.0)
        } else {
            (
                previous.iter().map(|t| t.percentage()).sum::<f64>() / previous.len() as f64,
                previous.iter().map(|t| t.accuracy).sum::<f64>() / previous.len() as f64,
            )
        };

        trend.score = round2(recent_score - previous_score);
        trend.accuracy = round2(recent_accuracy - previous_accuracy);
    }

    TestAnalytics {
        average_score,
        total_tests,
        best_score,
        average_time,
        recent_tests,
        weak_topics,
        subject_performance,
        trend,
    }
}

// ============================================================================
// Weak topics
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeakTopicDetail {
    pub topic: String,
    pub appearances: usize,
    pub last_seen: NaiveDateTime,
    pub test_types: Vec<String>,
    pub priority: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeakTopicReport {
    pub total_weak_topics: usize,
    pub high_priority: usize,
    pub analysis: Vec<WeakTopicDetail>,
}

/// Builds the detailed weak-topic report: appearance counts, the most recent
/// sighting, which exam tracks it showed up in, and a priority label (high
/// at 3+ appearances, medium at 2).
pub fn weak_topic_report(tests: &[TestResult]) -> WeakTopicReport {
    let mut analysis: Vec<WeakTopicDetail> = Vec::new();

    for test in tests {
        for topic in &test.weak_topics.0 {
            let entry = match analysis.iter_mut().find(|d| &d.topic == topic) {
                Some(entry) => entry,
                None => {
                    analysis.push(WeakTopicDetail {
                        topic: topic.clone(),
                        appearances: 0,
                        last_seen: test.date,
                        test_types: Vec::new(),
                        priority: "low",
                    });
                    analysis.last_mut().unwrap()
                }
            };

            entry.appearances += 1;
            if test.date > entry.last_seen {
                entry.last_seen = test.date;
            }
            let track = test.exam_type.as_str().to_string();
            if !entry.test_types.contains(&track) {
                entry.test_types.push(track);
            }
        }
    }

    for entry in &mut analysis {
        entry.priority = if entry.appearances >= 3 {
            "high"
        } else if entry.appearances >= 2 {
            "medium"
        } else {
            "low"
        };
    }

    analysis.sort_by(|a, b| b.appearances.cmp(&a.appearances));

    WeakTopicReport {
        total_weak_topics: analysis.len(),
        high_priority: analysis.iter().filter(|d| d.priority == "high").count(),
        analysis,
    }
}

// ============================================================================
// Timetable
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub progress_percentage: f64,
    pub day_progress: HashMap<String, f64>,
}

/// Per-day completion percentages across the whole week. Days with no
/// entries report 0.
pub fn weekly_progress(entries: &[TimetableEntry]) -> WeeklyProgress {
    let total_tasks = entries.len();
    let completed_tasks = entries.iter().filter(|entry| entry.completed).count();

    let mut day_progress: HashMap<String, f64> = HashMap::new();
    for day in DayOfWeek::all() {
        let day_total = entries.iter().filter(|entry| entry.day == day).count();
        let day_completed = entries
            .iter()
            .filter(|entry| entry.day == day && entry.completed)
            .count();
        day_progress.insert(
            day.as_str().to_string(),
            round1(percentage(day_completed, day_total)),
        );
    }

    WeeklyProgress {
        total_tasks,
        completed_tasks,
        progress_percentage: round1(percentage(completed_tasks, total_tasks)),
        day_progress,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSlotStats {
    pub total: usize,
    pub completed: usize,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimetableStats {
    pub total_entries: usize,
    pub completed_entries: usize,
    pub subject_distribution: HashMap<String, SubjectSlotStats>,
    pub time_slot_analysis: HashMap<String, CompletionCount>,
    pub completion_rate: f64,
}

pub fn timetable_stats(entries: &[TimetableEntry]) -> TimetableStats {
    let total_entries = entries.len();
    let completed_entries = entries.iter().filter(|entry| entry.completed).count();

    let mut subject_distribution: HashMap<String, SubjectSlotStats> = HashMap::new();
    for entry in entries {
        let stats = subject_distribution
            .entry(entry.subject.clone())
            .or_insert(SubjectSlotStats {
                total: 0,
                completed: 0,
                completion_rate: 0.0,
            });
        stats.total += 1;
        if entry.completed {
            stats.completed += 1;
        }
    }
    for stats in subject_distribution.values_mut() {
        stats.completion_rate = round1(percentage(stats.completed, stats.total));
    }

    let mut time_slot_analysis: HashMap<String, CompletionCount> = HashMap::new();
    for entry in entries {
        let slot = time_slot_analysis
            .entry(entry.time_slot.clone())
            .or_default();
        slot.total += 1;
        if entry.completed {
            slot.completed += 1;
        }
    }

    TimetableStats {
        total_entries,
        completed_entries,
        subject_distribution,
        time_slot_analysis,
        completion_rate: round1(percentage(completed_entries, total_entries)),
    }
}
