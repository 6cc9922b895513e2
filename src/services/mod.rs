//! Service layer: orchestration above the scheduling core and the
//! persistence layer.

pub mod optimizer;
pub mod pass_tracker;

pub use optimizer::{OptimizeError, OptimizerSettings, PassOutcome, ScheduleOptimizer};
pub use pass_tracker::{PassGuard, PassRecord, PassStatus, PassTracker};
