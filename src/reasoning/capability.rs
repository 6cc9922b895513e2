//! The external reasoning capability interface.
//!
//! The actual reasoning (schedule optimization, natural-language task
//! parsing) is delegated to an external LLM endpoint. This module defines
//! the narrow contract the rest of the crate programs against, so tests can
//! substitute a fake and the orchestrator never depends on a concrete
//! client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Event, SchedulingPreferences, Task, TaskPriority};

/// Failures of the external reasoning capability.
///
/// Every variant maps to the deterministic fallback path in the
/// orchestrator; none of them is fatal to a pass.
#[derive(Debug, thiserror::Error)]
pub enum ReasoningError {
    /// The endpoint could not be reached or returned an error status.
    #[error("reasoning endpoint unavailable: {0}")]
    Unavailable(String),

    /// The response body could not be interpreted as suggestions.
    #[error("malformed reasoning response: {0}")]
    MalformedResponse(String),

    /// The request exceeded the configured timeout.
    #[error("reasoning request timed out")]
    Timeout,
}

/// An unvalidated (task, window) proposal from the external capability.
///
/// Raw timestamps on purpose: the interval invariant is checked during
/// validation in the orchestrator, not trusted from the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSuggestion {
    pub task_id: i64,
    pub proposed_start: DateTime<Utc>,
    pub proposed_end: DateTime<Utc>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Structured task data extracted from natural-language input.
///
/// Fields the model could not determine are left `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    /// Estimated duration in minutes, if mentioned.
    #[serde(default)]
    pub estimated_duration: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// External reasoning capability.
///
/// Implementations must be `Send + Sync`; the orchestrator holds them as
/// `Arc<dyn ReasoningCapability>` so fakes can be substituted in tests.
#[async_trait]
pub trait ReasoningCapability: Send + Sync {
    /// Propose a schedule for the given tasks around the existing events.
    ///
    /// Returned suggestions are unvalidated; the orchestrator re-checks
    /// every one against the conflict detector and the task's
    /// duration/due-date constraints before accepting it.
    async fn suggest_schedule(
        &self,
        tasks: &[Task],
        events: &[Event],
        preferences: &SchedulingPreferences,
        now: DateTime<Utc>,
    ) -> Result<Vec<RawSuggestion>, ReasoningError>;

    /// Parse free-form task input into structured fields.
    ///
    /// Text in, structured task out; no natural-language understanding is
    /// implemented locally.
    async fn parse_task(
        &self,
        input: &str,
        now: DateTime<Utc>,
    ) -> Result<ParsedTask, ReasoningError>;
}
