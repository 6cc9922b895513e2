use serde::{Deserialize, Serialize};

use super::{TimeWindow, UserId};

/// Event identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub i64);

impl EventId {
    pub fn new(value: i64) -> Self {
        EventId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// An existing calendar commitment.
///
/// The start < end invariant is carried by [`TimeWindow`]; raw timestamps
/// with start >= end are rejected at construction and never reach the
/// scheduling layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub user_id: UserId,
    pub title: String,
    pub window: TimeWindow,
}

impl Event {
    pub fn new(id: EventId, user_id: UserId, title: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            id,
            user_id,
            title: title.into(),
            window,
        }
    }
}
