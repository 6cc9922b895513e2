//! Conflict detector: half-open interval overlap against busy blocks.
//!
//! Pure functions with no side effects. Overlap is symmetric by
//! construction of [`TimeWindow::overlaps`].

use crate::models::TimeWindow;

/// Whether `candidate` overlaps any of the given busy blocks.
pub fn has_conflict(candidate: &TimeWindow, busy: &[TimeWindow]) -> bool {
    busy.iter().any(|block| candidate.overlaps(block))
}

/// The busy blocks overlapping `candidate`, in input order.
pub fn detect_conflicts(candidate: &TimeWindow, busy: &[TimeWindow]) -> Vec<TimeWindow> {
    busy.iter()
        .filter(|block| candidate.overlaps(block))
        .copied()
        .collect()
}
