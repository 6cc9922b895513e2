//! Repository implementations module.
//!
//! Currently a single backend: `local`, an in-memory implementation for
//! unit testing and local development. Production SQL backends plug in
//! behind the same traits.

pub mod local;

pub use local::LocalRepository;
