//! Persistence layer: repository traits and backends.
//!
//! The database module follows the repository pattern so storage backends
//! can be swapped without touching the scheduling code:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Service Layer (services::optimizer)                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository) - Abstract Interface    │
//! │  SnapshotRepository / SuggestionRepository              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                 │
//!     │               (in-memory)                    │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! There is deliberately no process-global repository instance: callers
//! construct a backend and pass it to the orchestrator as
//! `Arc<dyn FullRepository>`, which keeps tests free to substitute fakes.

pub mod repositories;
pub mod repository;

pub use repositories::LocalRepository;
pub use repository::{
    ErrorContext, FullRepository, RepositoryError, RepositoryResult, SnapshotRepository,
    SuggestionRepository,
};
