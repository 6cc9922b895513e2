use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Task identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub i64);

impl TaskId {
    pub fn new(value: i64) -> Self {
        TaskId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    OnHold,
}

/// Task priority, ordered Low < Medium < High < Urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// A unit of work to be placed on the user's calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    /// Estimated duration in minutes. Must be positive to be schedulable.
    pub estimated_duration_minutes: u32,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
}

impl Task {
    /// Whether this task participates in scheduling.
    ///
    /// Completed, cancelled, and on-hold tasks are excluded, as are tasks
    /// with a zero duration estimate.
    pub fn is_schedulable(&self) -> bool {
        matches!(self.status, TaskStatus::Pending | TaskStatus::InProgress)
            && self.estimated_duration_minutes > 0
    }

    /// Estimated duration as a chrono `Duration`.
    pub fn estimated_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.estimated_duration_minutes))
    }
}
