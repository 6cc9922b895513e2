//! Domain data model: tasks, events, preferences, time windows, and
//! schedule suggestions.
//!
//! All types here are plain snapshots. The scheduling layer consumes them
//! read-only and returns suggestions; nothing in this module mutates storage.

pub mod event;
pub mod interval;
pub mod preference;
pub mod suggestion;
pub mod task;

pub use event::{Event, EventId};
pub use interval::{InvalidInterval, TimeWindow};
pub use preference::SchedulingPreferences;
pub use suggestion::{ScheduleSuggestion, SuggestionSource};
pub use task::{Task, TaskId, TaskPriority, TaskStatus};

use serde::{Deserialize, Serialize};

/// User identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        UserId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
