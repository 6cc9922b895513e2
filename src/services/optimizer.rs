//! Optimization orchestrator: one schedule-optimization pass per user.
//!
//! Packages the user's snapshot for the external reasoning capability,
//! validates every returned suggestion against the deterministic conflict
//! detector and slot constraints, and falls back to the deterministic slot
//! assigner for anything the capability failed to place. Capability failure
//! (timeout, transport error, malformed response) degrades the whole pass
//! to deterministic scheduling; it is never fatal.

use chrono::{DateTime, Duration, Utc};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::db::{FullRepository, RepositoryError};
use crate::models::{
    ScheduleSuggestion, Task, TaskId, TimeWindow, UserId,
};
use crate::reasoning::{RawSuggestion, ReasoningCapability};
use crate::scheduling::{
    assign_slot, free_windows, has_conflict, merge_busy_blocks, subtract_blocks, SchedulingError,
};

/// Tuning knobs for an optimization pass.
#[derive(Debug, Clone)]
pub struct OptimizerSettings {
    /// How far ahead of `now` to look for free windows.
    pub horizon_days: u32,
    /// Budget for the external reasoning call. On expiry the pass proceeds
    /// deterministically.
    pub reasoning_timeout: std::time::Duration,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            reasoning_timeout: std::time::Duration::from_secs(5),
        }
    }
}

/// Errors that abort a single user's pass.
///
/// Only persistence failures abort a pass; reasoning failures are absorbed
/// by the deterministic fallback.
#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of one optimization pass.
#[derive(Debug, Clone)]
pub struct PassOutcome {
    /// Validated placements, both externally suggested and deterministic.
    pub accepted: Vec<ScheduleSuggestion>,
    /// Tasks left unscheduled this pass, with the reason. Retried on the
    /// next pass.
    pub unscheduled: Vec<(TaskId, SchedulingError)>,
    /// Whether the external capability produced a usable response.
    pub external_used: bool,
}

/// Coordinates a single optimization pass for one user.
///
/// Holds the persistence store and the reasoning capability as explicit
/// handles; there are no process globals, so tests substitute fakes freely.
/// All inputs within a pass are immutable snapshots, so no locking is
/// needed here; concurrent passes for the *same* user must be serialized by
/// the caller (see [`super::pass_tracker::PassTracker`]).
pub struct ScheduleOptimizer {
    repository: Arc<dyn FullRepository>,
    capability: Arc<dyn ReasoningCapability>,
    settings: OptimizerSettings,
}

impl ScheduleOptimizer {
    pub fn new(
        repository: Arc<dyn FullRepository>,
        capability: Arc<dyn ReasoningCapability>,
        settings: OptimizerSettings,
    ) -> Self {
        Self {
            repository,
            capability,
            settings,
        }
    }

    /// Run one pass for `user_id`, anchored at `now`.
    ///
    /// Accepted placements are persisted through the repository before
    /// returning. A task that fits nowhere stays unscheduled and is
    /// reported in the outcome.
    pub async fn run_pass(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<PassOutcome, OptimizeError> {
        let horizon_days = self.settings.horizon_days.max(1);
        let horizon = TimeWindow::new(now, now + Duration::days(i64::from(horizon_days)))
            .expect("horizon has positive length");

        // Read-only snapshot.
        let tasks = self.repository.fetch_tasks(user_id).await?;
        let events = self.repository.fetch_events(user_id, horizon).await?;
        let preferences = self.repository.fetch_preferences(user_id).await?;

        let mut pending: BTreeMap<TaskId, Task> = tasks
            .into_iter()
            .filter(Task::is_schedulable)
            .map(|t| (t.id, t))
            .collect();

        if pending.is_empty() {
            debug!(user_id = user_id.value(), "no schedulable tasks, skipping pass");
            return Ok(PassOutcome {
                accepted: Vec::new(),
                unscheduled: Vec::new(),
                external_used: false,
            });
        }

        let busy = merge_busy_blocks(&events.iter().map(|e| e.window).collect::<Vec<_>>());
        let free = free_windows(&events, &preferences, horizon);

        info!(
            user_id = user_id.value(),
            tasks = pending.len(),
            events = events.len(),
            free_windows = free.len(),
            "starting optimization pass"
        );

        // The external call is the pass's sole suspension point.
        let snapshot: Vec<Task> = pending.values().cloned().collect();
        let (raw_suggestions, external_used) = match tokio::time::timeout(
            self.settings.reasoning_timeout,
            self.capability
                .suggest_schedule(&snapshot, &events, &preferences, now),
        )
        .await
        {
            Ok(Ok(suggestions)) => (suggestions, true),
            Ok(Err(e)) => {
                warn!(
                    user_id = user_id.value(),
                    error = %e,
                    "reasoning capability failed, falling back to deterministic scheduling"
                );
                (Vec::new(), false)
            }
            Err(_) => {
                warn!(
                    user_id = user_id.value(),
                    "reasoning capability timed out, falling back to deterministic scheduling"
                );
                (Vec::new(), false)
            }
        };

        // Validate external suggestions; accepted windows immediately join
        // the busy set so later acceptances and fallback placements cannot
        // double-book.
        let mut accepted: Vec<ScheduleSuggestion> = Vec::new();
        let mut busy_now = busy;
        for raw in raw_suggestions {
            let task_id = TaskId::new(raw.task_id);
            let Some(task) = pending.get(&task_id) else {
                debug!(task_id = raw.task_id, "discarding suggestion for unknown or done task");
                continue;
            };
            match validate_suggestion(task, &raw, &busy_now) {
                Ok(window) => {
                    busy_now.push(window);
                    accepted.push(ScheduleSuggestion::external(task_id, window, raw.confidence));
                    pending.remove(&task_id);
                }
                Err(reason) => {
                    debug!(
                        task_id = raw.task_id,
                        reason, "discarding invalid suggestion, task falls back"
                    );
                }
            }
        }

        // Deterministic fallback for everything the capability did not
        // place: priority first, then nearest due date, then id.
        let mut remaining: Vec<Task> = pending.into_values().collect();
        remaining.sort_by_key(|t| {
            (
                Reverse(t.priority),
                t.due_date.is_none(),
                t.due_date,
                t.id,
            )
        });

        let accepted_windows: Vec<TimeWindow> = accepted.iter().map(|s| s.window).collect();
        let mut free_now = subtract_blocks(&free, &accepted_windows);
        let mut unscheduled: Vec<(TaskId, SchedulingError)> = Vec::new();

        for task in remaining {
            match assign_slot(&task, &free_now, &busy_now) {
                Ok(window) => {
                    busy_now.push(window);
                    free_now = subtract_blocks(&free_now, &[window]);
                    accepted.push(ScheduleSuggestion::deterministic(task.id, window));
                }
                Err(e) => {
                    info!(
                        user_id = user_id.value(),
                        task_id = task.id.value(),
                        error = %e,
                        "task left unscheduled this pass"
                    );
                    unscheduled.push((task.id, e));
                }
            }
        }

        if !accepted.is_empty() {
            self.repository
                .store_suggestions(user_id, &accepted)
                .await?;
        }

        info!(
            user_id = user_id.value(),
            accepted = accepted.len(),
            unscheduled = unscheduled.len(),
            external_used,
            "optimization pass complete"
        );

        Ok(PassOutcome {
            accepted,
            unscheduled,
            external_used,
        })
    }
}

/// Check one external suggestion against the task's constraints and the
/// current busy set. Returns the validated window or a rejection reason.
fn validate_suggestion(
    task: &Task,
    raw: &RawSuggestion,
    busy: &[TimeWindow],
) -> Result<TimeWindow, &'static str> {
    let window = TimeWindow::new(raw.proposed_start, raw.proposed_end)
        .map_err(|_| "invalid interval (start >= end)")?;

    if window.duration() != task.estimated_duration() {
        return Err("window length does not match estimated duration");
    }
    if let Some(due) = task.due_date {
        if window.end() > due {
            return Err("window ends after due date");
        }
    }
    if has_conflict(&window, busy) {
        return Err("window overlaps an existing commitment");
    }
    Ok(window)
}
