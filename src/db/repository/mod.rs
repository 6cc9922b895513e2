//! Repository traits: the abstract persistence interface.
//!
//! The scheduling components never talk to storage directly. They read
//! immutable snapshots through [`SnapshotRepository`] and persist validated
//! placements through [`SuggestionRepository`]. Composed backends implement
//! [`FullRepository`].

use async_trait::async_trait;

use crate::models::{
    Event, ScheduleSuggestion, SchedulingPreferences, Task, TimeWindow, UserId,
};

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Read interface: per-user snapshots of tasks, events, and preferences.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Fetch all tasks for a user, regardless of status. Callers filter
    /// with [`Task::is_schedulable`].
    async fn fetch_tasks(&self, user_id: UserId) -> RepositoryResult<Vec<Task>>;

    /// Fetch the user's events overlapping `range`, ordered by start time.
    async fn fetch_events(&self, user_id: UserId, range: TimeWindow)
        -> RepositoryResult<Vec<Event>>;

    /// Fetch the user's working-hours preferences. Users without stored
    /// preferences get the defaults.
    async fn fetch_preferences(&self, user_id: UserId)
        -> RepositoryResult<SchedulingPreferences>;
}

/// Write interface: persisting validated schedule suggestions.
#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    /// Persist the chosen windows, one per task. Replaces any previous
    /// suggestion for the same task. Atomic per task.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of suggestions stored
    async fn store_suggestions(
        &self,
        user_id: UserId,
        suggestions: &[ScheduleSuggestion],
    ) -> RepositoryResult<usize>;

    /// Fetch the stored suggestions for a user, ordered by proposed start.
    async fn fetch_suggestions(&self, user_id: UserId)
        -> RepositoryResult<Vec<ScheduleSuggestion>>;
}

/// Combined repository interface used by the orchestrator.
pub trait FullRepository: SnapshotRepository + SuggestionRepository {}

impl<T: SnapshotRepository + SuggestionRepository> FullRepository for T {}
