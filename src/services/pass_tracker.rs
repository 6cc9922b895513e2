//! Per-user serialization of optimization passes.
//!
//! Passes for distinct users are independent and may run concurrently; two
//! passes for the same user are not safe to interleave (they would persist
//! suggestions computed from the same snapshot). The tracker hands out at
//! most one in-flight guard per user and records pass status for
//! observability.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::UserId;

/// Status of an optimization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassStatus {
    Running,
    Completed,
    Failed,
}

/// Record of a user's most recent pass.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PassRecord {
    pub pass_id: String,
    pub user_id: UserId,
    pub status: PassStatus,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Failure message, present for failed passes.
    pub detail: Option<String>,
}

/// In-memory pass tracker.
#[derive(Clone, Default)]
pub struct PassTracker {
    passes: Arc<RwLock<HashMap<UserId, PassRecord>>>,
}

impl PassTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a pass for `user_id`.
    ///
    /// Returns `None` if a pass for this user is already in flight; the
    /// caller must skip this cycle and retry later.
    pub fn begin(&self, user_id: UserId) -> Option<PassGuard> {
        let mut passes = self.passes.write();
        if let Some(existing) = passes.get(&user_id) {
            if existing.status == PassStatus::Running {
                return None;
            }
        }
        passes.insert(
            user_id,
            PassRecord {
                pass_id: Uuid::new_v4().to_string(),
                user_id,
                status: PassStatus::Running,
                started_at: chrono::Utc::now(),
                finished_at: None,
                detail: None,
            },
        );
        Some(PassGuard {
            tracker: self.clone(),
            user_id,
            finished: false,
        })
    }

    /// Get the latest pass record for a user.
    pub fn record(&self, user_id: UserId) -> Option<PassRecord> {
        self.passes.read().get(&user_id).cloned()
    }

    fn finish(&self, user_id: UserId, status: PassStatus, detail: Option<String>) {
        let mut passes = self.passes.write();
        if let Some(record) = passes.get_mut(&user_id) {
            record.status = status;
            record.finished_at = Some(chrono::Utc::now());
            record.detail = detail;
        }
    }
}

/// Guard for a single in-flight pass. Releases the user's slot when
/// finished or dropped.
pub struct PassGuard {
    tracker: PassTracker,
    user_id: UserId,
    finished: bool,
}

impl PassGuard {
    /// Mark the pass as completed.
    pub fn complete(mut self) {
        self.finished = true;
        self.tracker
            .finish(self.user_id, PassStatus::Completed, None);
    }

    /// Mark the pass as failed with a message.
    pub fn fail(mut self, detail: impl Into<String>) {
        self.finished = true;
        self.tracker
            .finish(self.user_id, PassStatus::Failed, Some(detail.into()));
    }
}

impl Drop for PassGuard {
    fn drop(&mut self) {
        // A guard dropped without an explicit outcome (e.g., the pass task
        // panicked or was cancelled) must still release the user's slot.
        if !self.finished {
            self.tracker.finish(
                self.user_id,
                PassStatus::Failed,
                Some("pass aborted".to_string()),
            );
        }
    }
}
