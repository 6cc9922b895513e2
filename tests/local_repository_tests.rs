//! Behavioral tests for the in-memory repository backend.

use chrono::{DateTime, NaiveTime, TimeZone, Utc};

use flowmind_rust::db::{
    LocalRepository, RepositoryError, SnapshotRepository, SuggestionRepository,
};
use flowmind_rust::models::{
    Event, EventId, ScheduleSuggestion, SchedulingPreferences, Task, TaskId, TaskPriority,
    TaskStatus, TimeWindow, UserId,
};

const USER: UserId = UserId(1);
const OTHER_USER: UserId = UserId(2);

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

fn win(day: u32, h1: u32, h2: u32) -> TimeWindow {
    TimeWindow::new(at(day, h1), at(day, h2)).unwrap()
}

fn task(id: i64, user: UserId) -> Task {
    Task {
        id: TaskId::new(id),
        user_id: user,
        title: format!("task-{id}"),
        estimated_duration_minutes: 30,
        due_date: None,
        priority: TaskPriority::Medium,
        status: TaskStatus::Pending,
    }
}

#[tokio::test]
async fn fetch_tasks_returns_sorted_copies() {
    let repo = LocalRepository::new();
    repo.upsert_task(task(3, USER));
    repo.upsert_task(task(1, USER));
    repo.upsert_task(task(2, USER));

    let tasks = repo.fetch_tasks(USER).await.unwrap();
    let ids: Vec<i64> = tasks.iter().map(|t| t.id.value()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn fetch_tasks_is_scoped_per_user() {
    let repo = LocalRepository::new();
    repo.upsert_task(task(1, USER));
    repo.upsert_task(task(2, OTHER_USER));

    assert_eq!(repo.fetch_tasks(USER).await.unwrap().len(), 1);
    assert_eq!(repo.fetch_tasks(OTHER_USER).await.unwrap().len(), 1);
    assert!(repo.fetch_tasks(UserId(99)).await.unwrap().is_empty());
}

#[tokio::test]
async fn upsert_task_replaces_existing() {
    let repo = LocalRepository::new();
    repo.upsert_task(task(1, USER));
    let mut updated = task(1, USER);
    updated.status = TaskStatus::Completed;
    repo.upsert_task(updated);

    let tasks = repo.fetch_tasks(USER).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Completed);
}

#[tokio::test]
async fn fetch_events_filters_by_range_and_sorts() {
    let repo = LocalRepository::new();
    repo.insert_event(Event::new(EventId::new(2), USER, "later", win(12, 9, 10)));
    repo.insert_event(Event::new(EventId::new(1), USER, "in-range", win(11, 14, 15)));
    repo.insert_event(Event::new(EventId::new(3), USER, "early", win(11, 9, 10)));

    let range = win(11, 0, 23);
    let events = repo.fetch_events(USER, range).await.unwrap();
    let ids: Vec<i64> = events.iter().map(|e| e.id.value()).collect();
    assert_eq!(ids, vec![3, 1]);
}

#[tokio::test]
async fn fetch_events_includes_partial_overlap() {
    let repo = LocalRepository::new();
    let spanning = TimeWindow::new(at(10, 22), at(11, 10)).unwrap();
    repo.insert_event(Event::new(EventId::new(1), USER, "overnight", spanning));

    let events = repo.fetch_events(USER, win(11, 0, 23)).await.unwrap();
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn preferences_default_when_unset() {
    let repo = LocalRepository::new();
    let prefs = repo.fetch_preferences(USER).await.unwrap();
    assert_eq!(prefs.work_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert_eq!(prefs.work_end, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
}

#[tokio::test]
async fn stored_preferences_round_trip() {
    let repo = LocalRepository::new();
    let custom = SchedulingPreferences {
        work_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        work_end: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        day_overrides: Default::default(),
    };
    repo.set_preferences(USER, custom.clone());

    let prefs = repo.fetch_preferences(USER).await.unwrap();
    assert_eq!(prefs.work_start, custom.work_start);
    assert_eq!(prefs.work_end, custom.work_end);
}

#[tokio::test]
async fn store_suggestions_replaces_per_task() {
    let repo = LocalRepository::new();
    repo.upsert_task(task(1, USER));

    let first = ScheduleSuggestion::deterministic(TaskId::new(1), win(11, 9, 10));
    repo.store_suggestions(USER, &[first]).await.unwrap();

    let second = ScheduleSuggestion::external(TaskId::new(1), win(11, 14, 15), Some(0.9));
    let stored_count = repo.store_suggestions(USER, &[second]).await.unwrap();
    assert_eq!(stored_count, 1);

    let stored = repo.fetch_suggestions(USER).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].window, win(11, 14, 15));
    assert_eq!(stored[0].confidence, Some(0.9));
}

#[tokio::test]
async fn store_suggestions_rejects_unknown_task() {
    let repo = LocalRepository::new();
    let suggestion = ScheduleSuggestion::deterministic(TaskId::new(42), win(11, 9, 10));
    let err = repo.store_suggestions(USER, &[suggestion]).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn store_suggestions_rejects_foreign_task() {
    let repo = LocalRepository::new();
    repo.upsert_task(task(1, OTHER_USER));
    // Task 1 lives under OTHER_USER's records, so USER cannot reference it.
    let suggestion = ScheduleSuggestion::deterministic(TaskId::new(1), win(11, 9, 10));
    let err = repo.store_suggestions(USER, &[suggestion]).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn rejected_batch_stores_nothing() {
    let repo = LocalRepository::new();
    repo.upsert_task(task(1, USER));

    // Valid suggestion first, then one for a task that does not exist; the
    // failed batch must not leave the valid half behind.
    let valid = ScheduleSuggestion::deterministic(TaskId::new(1), win(11, 9, 10));
    let orphan = ScheduleSuggestion::deterministic(TaskId::new(42), win(11, 14, 15));
    let err = repo
        .store_suggestions(USER, &[valid, orphan])
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));

    assert!(repo.fetch_suggestions(USER).await.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_suggestions_sorted_by_start() {
    let repo = LocalRepository::new();
    repo.upsert_task(task(1, USER));
    repo.upsert_task(task(2, USER));

    let late = ScheduleSuggestion::deterministic(TaskId::new(1), win(11, 14, 15));
    let early = ScheduleSuggestion::deterministic(TaskId::new(2), win(11, 9, 10));
    repo.store_suggestions(USER, &[late, early]).await.unwrap();

    let stored = repo.fetch_suggestions(USER).await.unwrap();
    let ids: Vec<i64> = stored.iter().map(|s| s.task_id.value()).collect();
    assert_eq!(ids, vec![2, 1]);
}
