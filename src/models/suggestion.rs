use serde::{Deserialize, Serialize};

use super::{TaskId, TimeWindow};

/// Where a schedule suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// Produced by the deterministic slot assigner.
    Deterministic,
    /// Proposed by the external reasoning capability and validated locally.
    ExternallySuggested,
}

/// A validated (task, window) placement ready to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSuggestion {
    pub task_id: TaskId,
    pub window: TimeWindow,
    pub source: SuggestionSource,
    /// Model confidence in [0, 1]. Only present for externally suggested
    /// placements.
    pub confidence: Option<f64>,
}

impl ScheduleSuggestion {
    pub fn deterministic(task_id: TaskId, window: TimeWindow) -> Self {
        Self {
            task_id,
            window,
            source: SuggestionSource::Deterministic,
            confidence: None,
        }
    }

    pub fn external(task_id: TaskId, window: TimeWindow, confidence: Option<f64>) -> Self {
        Self {
            task_id,
            window,
            source: SuggestionSource::ExternallySuggested,
            confidence,
        }
    }
}
