//! End-to-end tests for the optimization orchestrator: external
//! suggestions validated against the deterministic core, with full
//! deterministic fallback on capability failure.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use flowmind_rust::db::LocalRepository;
use flowmind_rust::models::{
    Event, EventId, SchedulingPreferences, SuggestionSource, Task, TaskId, TaskPriority,
    TaskStatus, TimeWindow, UserId,
};
use flowmind_rust::reasoning::{
    ParsedTask, RawSuggestion, ReasoningCapability, ReasoningError,
};
use flowmind_rust::services::{OptimizerSettings, ScheduleOptimizer};

const USER: UserId = UserId(1);

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 11, hour, min, 0).unwrap()
}

fn win(h1: u32, m1: u32, h2: u32, m2: u32) -> TimeWindow {
    TimeWindow::new(at(h1, m1), at(h2, m2)).unwrap()
}

fn task(id: i64, minutes: u32, due: Option<DateTime<Utc>>) -> Task {
    Task {
        id: TaskId::new(id),
        user_id: USER,
        title: format!("task-{id}"),
        estimated_duration_minutes: minutes,
        due_date: due,
        priority: TaskPriority::Medium,
        status: TaskStatus::Pending,
    }
}

/// Repository with working hours 09:00-17:00 and one event 10:00-11:00.
fn seeded_repo(tasks: &[Task]) -> Arc<LocalRepository> {
    let repo = Arc::new(LocalRepository::new());
    repo.set_preferences(USER, SchedulingPreferences::default());
    repo.insert_event(Event::new(
        EventId::new(100),
        USER,
        "standup",
        win(10, 0, 11, 0),
    ));
    for t in tasks {
        repo.upsert_task(t.clone());
    }
    repo
}

/// Scripted stand-in for the external reasoning endpoint.
enum FakeBehavior {
    Suggest(Vec<RawSuggestion>),
    Fail,
    Hang,
}

struct FakeReasoner {
    behavior: FakeBehavior,
}

#[async_trait]
impl ReasoningCapability for FakeReasoner {
    async fn suggest_schedule(
        &self,
        _tasks: &[Task],
        _events: &[Event],
        _preferences: &SchedulingPreferences,
        _now: DateTime<Utc>,
    ) -> Result<Vec<RawSuggestion>, ReasoningError> {
        match &self.behavior {
            FakeBehavior::Suggest(suggestions) => Ok(suggestions.clone()),
            FakeBehavior::Fail => Err(ReasoningError::Unavailable("endpoint down".to_string())),
            FakeBehavior::Hang => {
                tokio::time::sleep(std::time::Duration::from_secs(600)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn parse_task(
        &self,
        _input: &str,
        _now: DateTime<Utc>,
    ) -> Result<ParsedTask, ReasoningError> {
        Err(ReasoningError::Unavailable("not used here".to_string()))
    }
}

fn optimizer(repo: Arc<LocalRepository>, behavior: FakeBehavior) -> ScheduleOptimizer {
    ScheduleOptimizer::new(
        repo,
        Arc::new(FakeReasoner { behavior }),
        OptimizerSettings {
            horizon_days: 1,
            reasoning_timeout: std::time::Duration::from_secs(2),
        },
    )
}

#[tokio::test]
async fn capability_failure_falls_back_to_deterministic_scheduling() {
    let repo = seeded_repo(&[task(1, 90, None), task(2, 60, None)]);
    let optimizer = optimizer(repo.clone(), FakeBehavior::Fail);

    let outcome = optimizer.run_pass(USER, at(8, 0)).await.unwrap();

    assert!(!outcome.external_used);
    assert!(outcome.unscheduled.is_empty());
    assert!(outcome
        .accepted
        .iter()
        .all(|s| s.source == SuggestionSource::Deterministic));
    // The 90-minute task cannot fit 09:00-10:00 and lands at 11:00-12:30;
    // the 60-minute task then takes 09:00-10:00.
    let by_task = |id: i64| {
        outcome
            .accepted
            .iter()
            .find(|s| s.task_id == TaskId::new(id))
            .unwrap()
            .window
    };
    assert_eq!(by_task(1), win(11, 0, 12, 30));
    assert_eq!(by_task(2), win(9, 0, 10, 0));
}

#[tokio::test(start_paused = true)]
async fn capability_timeout_yields_zero_external_entries() {
    let repo = seeded_repo(&[task(1, 90, None), task(2, 60, None)]);
    let optimizer = optimizer(repo.clone(), FakeBehavior::Hang);

    let outcome = optimizer.run_pass(USER, at(8, 0)).await.unwrap();

    assert!(!outcome.external_used);
    assert_eq!(
        outcome
            .accepted
            .iter()
            .filter(|s| s.source == SuggestionSource::ExternallySuggested)
            .count(),
        0
    );
    // Same output as the deterministic-only run.
    let by_task = |id: i64| {
        outcome
            .accepted
            .iter()
            .find(|s| s.task_id == TaskId::new(id))
            .unwrap()
            .window
    };
    assert_eq!(by_task(1), win(11, 0, 12, 30));
    assert_eq!(by_task(2), win(9, 0, 10, 0));
}

#[tokio::test]
async fn valid_external_suggestion_is_accepted() {
    let repo = seeded_repo(&[task(1, 60, None)]);
    let suggestion = RawSuggestion {
        task_id: 1,
        proposed_start: at(14, 0),
        proposed_end: at(15, 0),
        confidence: Some(0.85),
    };
    let optimizer = optimizer(repo.clone(), FakeBehavior::Suggest(vec![suggestion]));

    let outcome = optimizer.run_pass(USER, at(8, 0)).await.unwrap();

    assert!(outcome.external_used);
    assert_eq!(outcome.accepted.len(), 1);
    let accepted = &outcome.accepted[0];
    assert_eq!(accepted.source, SuggestionSource::ExternallySuggested);
    assert_eq!(accepted.window, win(14, 0, 15, 0));
    assert_eq!(accepted.confidence, Some(0.85));
}

#[tokio::test]
async fn conflicting_external_suggestion_gets_deterministic_fallback() {
    // The suggestion overlaps the 10:00-11:00 event and must be discarded.
    let repo = seeded_repo(&[task(1, 60, None)]);
    let suggestion = RawSuggestion {
        task_id: 1,
        proposed_start: at(10, 30),
        proposed_end: at(11, 30),
        confidence: Some(0.99),
    };
    let optimizer = optimizer(repo.clone(), FakeBehavior::Suggest(vec![suggestion]));

    let outcome = optimizer.run_pass(USER, at(8, 0)).await.unwrap();

    assert_eq!(outcome.accepted.len(), 1);
    let accepted = &outcome.accepted[0];
    assert_eq!(accepted.source, SuggestionSource::Deterministic);
    assert_eq!(accepted.window, win(9, 0, 10, 0));
    assert!(accepted.confidence.is_none());
}

#[tokio::test]
async fn wrong_duration_suggestion_is_discarded() {
    // 30-minute window for a 60-minute task.
    let repo = seeded_repo(&[task(1, 60, None)]);
    let suggestion = RawSuggestion {
        task_id: 1,
        proposed_start: at(14, 0),
        proposed_end: at(14, 30),
        confidence: None,
    };
    let optimizer = optimizer(repo.clone(), FakeBehavior::Suggest(vec![suggestion]));

    let outcome = optimizer.run_pass(USER, at(8, 0)).await.unwrap();

    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.accepted[0].source, SuggestionSource::Deterministic);
}

#[tokio::test]
async fn accepted_and_fallback_windows_never_double_book() {
    // External places task 1 at 09:00-10:00; task 2's fallback must avoid
    // both the event and the accepted window.
    let repo = seeded_repo(&[task(1, 60, None), task(2, 60, None)]);
    let suggestion = RawSuggestion {
        task_id: 1,
        proposed_start: at(9, 0),
        proposed_end: at(10, 0),
        confidence: Some(0.7),
    };
    let optimizer = optimizer(repo.clone(), FakeBehavior::Suggest(vec![suggestion]));

    let outcome = optimizer.run_pass(USER, at(8, 0)).await.unwrap();

    assert_eq!(outcome.accepted.len(), 2);
    for pair in outcome.accepted.windows(2) {
        assert!(!pair[0].window.overlaps(&pair[1].window));
    }
    let fallback = outcome
        .accepted
        .iter()
        .find(|s| s.task_id == TaskId::new(2))
        .unwrap();
    assert_eq!(fallback.window, win(11, 0, 12, 0));
}

#[tokio::test]
async fn unsatisfiable_task_is_reported_unscheduled() {
    // Due date before any window can end.
    let repo = seeded_repo(&[task(1, 60, Some(at(9, 30)))]);
    let optimizer = optimizer(repo.clone(), FakeBehavior::Fail);

    let outcome = optimizer.run_pass(USER, at(8, 0)).await.unwrap();

    assert!(outcome.accepted.is_empty());
    assert_eq!(outcome.unscheduled.len(), 1);
    assert_eq!(outcome.unscheduled[0].0, TaskId::new(1));
}

#[tokio::test]
async fn completed_tasks_are_excluded_from_scheduling() {
    let mut done = task(1, 60, None);
    done.status = TaskStatus::Completed;
    let repo = seeded_repo(&[done, task(2, 30, None)]);
    let optimizer = optimizer(repo.clone(), FakeBehavior::Fail);

    let outcome = optimizer.run_pass(USER, at(8, 0)).await.unwrap();

    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.accepted[0].task_id, TaskId::new(2));
}

#[tokio::test]
async fn accepted_suggestions_are_persisted() {
    use flowmind_rust::db::SuggestionRepository;

    let repo = seeded_repo(&[task(1, 60, None)]);
    let optimizer = optimizer(repo.clone(), FakeBehavior::Fail);

    let outcome = optimizer.run_pass(USER, at(8, 0)).await.unwrap();
    assert_eq!(outcome.accepted.len(), 1);

    let stored = repo.fetch_suggestions(USER).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].task_id, TaskId::new(1));
    assert_eq!(stored[0].window, outcome.accepted[0].window);
}

#[tokio::test]
async fn urgent_tasks_are_placed_first() {
    // Both tasks want the earliest slot; the urgent one wins it.
    let mut urgent = task(2, 60, None);
    urgent.priority = TaskPriority::Urgent;
    let repo = seeded_repo(&[task(1, 60, None), urgent]);
    let optimizer = optimizer(repo.clone(), FakeBehavior::Fail);

    let outcome = optimizer.run_pass(USER, at(8, 0)).await.unwrap();

    let by_task = |id: i64| {
        outcome
            .accepted
            .iter()
            .find(|s| s.task_id == TaskId::new(id))
            .unwrap()
            .window
    };
    assert_eq!(by_task(2), win(9, 0, 10, 0));
    assert_eq!(by_task(1), win(11, 0, 12, 0));
}
