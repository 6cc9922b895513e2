//! Slot assigner: earliest-fit placement of a task into free windows.

use chrono::Duration;

use crate::models::{InvalidInterval, Task, TimeWindow};
use crate::scheduling::conflict::has_conflict;

/// Errors surfaced by the deterministic scheduling components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulingError {
    /// No free window satisfies the task's duration and due-date
    /// constraints. The task stays unscheduled for this pass and is
    /// retried on the next one.
    #[error("no available slot for task (duration {duration_minutes} min)")]
    NoAvailableSlot { duration_minutes: u32 },

    /// An input interval failed validation (start >= end).
    #[error(transparent)]
    InvalidInterval(#[from] InvalidInterval),
}

/// Pick a window of exactly the task's estimated duration from `free_windows`.
///
/// Policy:
/// - placements start at a free window's start and must fit inside it;
/// - a due date is a hard constraint: the placement must end on or before it;
/// - earliest placement wins, ties broken by window start ascending, then by
///   free-window length ascending (tightest fit first, to limit
///   fragmentation);
/// - the chosen placement is re-validated against `busy` through the
///   conflict detector before being returned, guarding against stale
///   snapshots.
pub fn assign_slot(
    task: &Task,
    free_windows: &[TimeWindow],
    busy: &[TimeWindow],
) -> Result<TimeWindow, SchedulingError> {
    let duration = task.estimated_duration();
    if duration <= Duration::zero() {
        return Err(SchedulingError::NoAvailableSlot {
            duration_minutes: task.estimated_duration_minutes,
        });
    }

    let mut candidates: Vec<(TimeWindow, Duration)> = free_windows
        .iter()
        .filter(|w| w.duration() >= duration)
        .map(|w| {
            let slot = TimeWindow::new(w.start(), w.start() + duration)
                .expect("slot has positive duration");
            (slot, w.duration())
        })
        .filter(|(slot, _)| match task.due_date {
            Some(due) => slot.end() <= due,
            None => true,
        })
        .collect();

    candidates.sort_by_key(|(slot, window_len)| (slot.start(), *window_len));

    candidates
        .into_iter()
        .map(|(slot, _)| slot)
        .find(|slot| !has_conflict(slot, busy))
        .ok_or(SchedulingError::NoAvailableSlot {
            duration_minutes: task.estimated_duration_minutes,
        })
}
