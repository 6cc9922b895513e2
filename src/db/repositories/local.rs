//! In-memory repository implementation for unit testing and local
//! development.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, SnapshotRepository, SuggestionRepository,
};
use crate::models::{
    Event, ScheduleSuggestion, SchedulingPreferences, Task, TaskId, TimeWindow, UserId,
};

#[derive(Debug, Default)]
struct UserRecords {
    tasks: HashMap<TaskId, Task>,
    events: Vec<Event>,
    preferences: Option<SchedulingPreferences>,
    suggestions: HashMap<TaskId, ScheduleSuggestion>,
}

/// In-memory repository backed by a `parking_lot::RwLock`.
///
/// Snapshots returned from the read interface are deep copies, matching the
/// read-only-snapshot contract of the scheduling layer.
#[derive(Default)]
pub struct LocalRepository {
    users: RwLock<HashMap<UserId, UserRecords>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a task.
    pub fn upsert_task(&self, task: Task) {
        let mut users = self.users.write();
        users
            .entry(task.user_id)
            .or_default()
            .tasks
            .insert(task.id, task);
    }

    /// Insert an event.
    pub fn insert_event(&self, event: Event) {
        let mut users = self.users.write();
        users.entry(event.user_id).or_default().events.push(event);
    }

    /// Set a user's working-hours preferences.
    pub fn set_preferences(&self, user_id: UserId, preferences: SchedulingPreferences) {
        let mut users = self.users.write();
        users.entry(user_id).or_default().preferences = Some(preferences);
    }
}

#[async_trait]
impl SnapshotRepository for LocalRepository {
    async fn fetch_tasks(&self, user_id: UserId) -> RepositoryResult<Vec<Task>> {
        let users = self.users.read();
        let mut tasks: Vec<Task> = users
            .get(&user_id)
            .map(|r| r.tasks.values().cloned().collect())
            .unwrap_or_default();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn fetch_events(
        &self,
        user_id: UserId,
        range: TimeWindow,
    ) -> RepositoryResult<Vec<Event>> {
        let users = self.users.read();
        let mut events: Vec<Event> = users
            .get(&user_id)
            .map(|r| {
                r.events
                    .iter()
                    .filter(|e| e.window.overlaps(&range))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        events.sort_by_key(|e| e.window.start());
        Ok(events)
    }

    async fn fetch_preferences(
        &self,
        user_id: UserId,
    ) -> RepositoryResult<SchedulingPreferences> {
        let users = self.users.read();
        Ok(users
            .get(&user_id)
            .and_then(|r| r.preferences.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl SuggestionRepository for LocalRepository {
    async fn store_suggestions(
        &self,
        user_id: UserId,
        suggestions: &[ScheduleSuggestion],
    ) -> RepositoryResult<usize> {
        let mut users = self.users.write();
        let records = users.entry(user_id).or_default();

        // The whole batch is validated against the owning tasks before the
        // first write, so a rejected batch leaves the store untouched.
        for suggestion in suggestions {
            let task = records.tasks.get(&suggestion.task_id).ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "suggestion references unknown task",
                    ErrorContext::new("store_suggestions")
                        .with_entity("task")
                        .with_entity_id(suggestion.task_id.value()),
                )
            })?;
            if task.user_id != user_id {
                return Err(RepositoryError::validation_with_context(
                    "suggestion references another user's task",
                    ErrorContext::new("store_suggestions")
                        .with_entity("task")
                        .with_entity_id(suggestion.task_id.value()),
                ));
            }
        }

        // One suggestion per task, later batches replace earlier ones.
        for suggestion in suggestions {
            records
                .suggestions
                .insert(suggestion.task_id, suggestion.clone());
        }
        Ok(suggestions.len())
    }

    async fn fetch_suggestions(
        &self,
        user_id: UserId,
    ) -> RepositoryResult<Vec<ScheduleSuggestion>> {
        let users = self.users.read();
        let mut suggestions: Vec<ScheduleSuggestion> = users
            .get(&user_id)
            .map(|r| r.suggestions.values().cloned().collect())
            .unwrap_or_default();
        suggestions.sort_by_key(|s| s.window.start());
        Ok(suggestions)
    }
}
