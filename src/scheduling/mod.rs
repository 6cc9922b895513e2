//! Deterministic scheduling core.
//!
//! Three pure components operating on immutable snapshots:
//!
//! - [`availability`]: free/busy window computation from events and
//!   working-hours preferences
//! - [`conflict`]: half-open interval overlap detection
//! - [`slot`]: earliest-fit, due-date-respecting slot assignment
//!
//! None of these touch storage; they take snapshots in and return windows
//! out. The orchestrator in [`crate::services::optimizer`] wires them
//! together around the external reasoning capability.

pub mod availability;
pub mod conflict;
pub mod slot;

pub use availability::{free_windows, merge_busy_blocks, subtract_blocks, total_free_time};
pub use conflict::{detect_conflicts, has_conflict};
pub use slot::{assign_slot, SchedulingError};
