//! # FlowMind Scheduling Core
//!
//! Deterministic scheduling engine for the FlowMind productivity backend.
//!
//! The crate computes free/busy availability from a user's calendar and
//! working-hours preferences, detects conflicts, assigns tasks to free
//! slots (earliest-fit, due-date respecting), and orchestrates a single
//! AI-assisted optimization pass per user: suggestions from an external
//! reasoning capability are validated against the deterministic core
//! before anything is persisted, and any capability failure degrades the
//! pass to fully deterministic scheduling.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: task/event/preference/suggestion snapshots and the
//!   half-open [`models::TimeWindow`] interval type
//! - [`scheduling`]: the pure availability / conflict / slot-assignment
//!   core
//! - [`reasoning`]: the external LLM capability interface and its
//!   Grok-backed client
//! - [`services`]: the optimization orchestrator and per-user pass
//!   serialization
//! - [`db`]: repository traits and the in-memory backend
//! - [`config`]: settings for the reasoning endpoint
//!
//! ## External collaborators
//!
//! HTTP routing, authentication, calendar-provider sync, and the periodic
//! trigger that invokes passes are all outside this crate. Persistence is
//! abstract behind [`db::FullRepository`]; the reasoning endpoint behind
//! [`reasoning::ReasoningCapability`]. Both are passed in as explicit
//! handles rather than process globals, so tests substitute fakes.

pub mod config;
pub mod db;
pub mod models;
pub mod reasoning;
pub mod scheduling;
pub mod services;
