//! External reasoning capability interface and its Grok-backed client.

pub mod capability;
pub mod grok;

pub use capability::{ParsedTask, RawSuggestion, ReasoningCapability, ReasoningError};
pub use grok::GrokClient;
