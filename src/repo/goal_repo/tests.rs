use super::*;
use crate::models::{GoalCategory, Priority};
use crate::repo::create_user;
use crate::test_utils::setup_test_db;

fn test_user(pool: &DbPool) -> String {
    create_user(pool, "asha@example.com", "hash", "Asha")
        .unwrap()
        .id
}

fn goal_dto(title: &str, deadline: NaiveDate, priority: Priority) -> CreateGoalDto {
    CreateGoalDto {
        title: title.to_string(),
        description: "Cover the full chapter".to_string(),
        deadline,
        priority,
        category: GoalCategory::Syllabus,
    }
}

fn in_days(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

#[test]
fn test_create_and_get_goal() {
    let pool = setup_test_db();
    let user_id = test_user(&pool);

    let goal = create_goal(&pool, &user_id, goal_dto("Finish optics", in_days(14), Priority::High))
        .unwrap();
    assert_eq!(goal.progress, 0);
    assert!(!goal.completed);

    let fetched = get_goal(&pool, &user_id, &goal.id).unwrap().unwrap();
    assert_eq!(fetched, goal);
}

#[test]
fn test_list_goals_orders_by_deadline_and_filters() {
    let pool = setup_test_db();
    let user_id = test_user(&pool);

    let later = create_goal(&pool, &user_id, goal_dto("Later", in_days(20), Priority::Low)).unwrap();
    let soon = create_goal(&pool, &user_id, goal_dto("Soon", in_days(3), Priority::High)).unwrap();

    let all = list_goals(&pool, &user_id, &GoalListQuery::default()).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, soon.id);
    assert_eq!(all[1].id, later.id);

    let high = list_goals(
        &pool,
        &user_id,
        &GoalListQuery {
            category: None,
            priority: Some(Priority::High),
            completed: None,
        },
    )
    .unwrap();
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].id, soon.id);
}

#[test]
fn test_update_goal_partial_fields() {
    let pool = setup_test_db();
    let user_id = test_user(&pool);

    let goal =
        create_goal(&pool, &user_id, goal_dto("Finish optics", in_days(14), Priority::Low)).unwrap();

    let (updated, newly_completed) = update_goal(
        &pool,
        &user_id,
        &goal.id,
        UpdateGoalDto {
            title: Some("Finish ray optics".to_string()),
            description: None,
            deadline: None,
            progress: Some(40),
            priority: None,
            category: None,
            completed: None,
        },
    )
    .unwrap()
    .unwrap();

    assert!(!newly_completed);
    assert_eq!(updated.title, "Finish ray optics");
    assert_eq!(updated.progress, 40);
    assert_eq!(updated.priority, Priority::Low);
    assert!(updated.updated_at >= goal.updated_at);
}

#[test]
fn test_update_goal_clamps_progress() {
    let pool = setup_test_db();
    let user_id = test_user(&pool);

    let goal =
        create_goal(&pool, &user_id, goal_dto("Clamped", in_days(5), Priority::Medium)).unwrap();

    let progress_only = |progress: i32| UpdateGoalDto {
        title: None,
        description: None,
        deadline: None,
        progress: Some(progress),
        priority: None,
        category: None,
        completed: None,
    };

    let (below, _) = update_goal(&pool, &user_id, &goal.id, progress_only(-20))
        .unwrap()
        .unwrap();
    assert_eq!(below.progress, 0);

    let (above, newly_completed) = update_goal(&pool, &user_id, &goal.id, progress_only(150))
        .unwrap()
        .unwrap();
    assert_eq!(above.progress, 100);
    assert!(newly_completed);
    assert!(above.completed);
}

#[test]
fn test_full_progress_completes_only_once() {
    let pool = setup_test_db();
    let user_id = test_user(&pool);

    let goal =
        create_goal(&pool, &user_id, goal_dto("Once", in_days(5), Priority::High)).unwrap();

    let full = UpdateGoalDto {
        title: None,
        description: None,
        deadline: None,
        progress: Some(100),
        priority: None,
        category: None,
        completed: None,
    };

    let (_, first) = update_goal(&pool, &user_id, &goal.id, full).unwrap().unwrap();
    assert!(first);

    let again = UpdateGoalDto {
        title: None,
        description: None,
        deadline: None,
        progress: Some(100),
        priority: None,
        category: None,
        completed: None,
    };
    let (_, second) = update_goal(&pool, &user_id, &goal.id, again).unwrap().unwrap();
    assert!(!second);
}

#[test]
fn test_explicit_completed_flag_does_not_count_as_fresh_completion() {
    let pool = setup_test_db();
    let user_id = test_user(&pool);

    let goal =
        create_goal(&pool, &user_id, goal_dto("Manual", in_days(5), Priority::High)).unwrap();

    let (updated, newly_completed) = update_goal(
        &pool,
        &user_id,
        &goal.id,
        UpdateGoalDto {
            title: None,
            description: None,
            deadline: None,
            progress: None,
            priority: None,
            category: None,
            completed: Some(true),
        },
    )
    .unwrap()
    .unwrap();

    assert!(updated.completed);
    assert!(!newly_completed);
}

#[test]
fn test_delete_goal() {
    let pool = setup_test_db();
    let user_id = test_user(&pool);

    let goal = create_goal(&pool, &user_id, goal_dto("Gone", in_days(5), Priority::Low)).unwrap();

    assert!(delete_goal(&pool, &user_id, &goal.id).unwrap());
    assert!(get_goal(&pool, &user_id, &goal.id).unwrap().is_none());
    assert!(!delete_goal(&pool, &user_id, &goal.id).unwrap());
}

#[test]
fn test_list_upcoming_goals_window() {
    let pool = setup_test_db();
    let user_id = test_user(&pool);

    let near = create_goal(&pool, &user_id, goal_dto("Near", in_days(2), Priority::High)).unwrap();
    create_goal(&pool, &user_id, goal_dto("Far", in_days(10), Priority::High)).unwrap();
    create_goal(&pool, &user_id, goal_dto("Past", in_days(-1), Priority::High)).unwrap();

    let done = create_goal(&pool, &user_id, goal_dto("Done", in_days(3), Priority::High)).unwrap();
    update_goal(
        &pool,
        &user_id,
        &done.id,
        UpdateGoalDto {
            title: None,
            description: None,
            deadline: None,
            progress: None,
            priority: None,
            category: None,
            completed: Some(true),
        },
    )
    .unwrap();

    let upcoming = list_upcoming_goals(&pool, &user_id, 7).unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id, near.id);
}
