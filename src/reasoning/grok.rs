//! Grok client for the reasoning capability.
//!
//! Works against any OpenAI-compatible chat-completions API (Grok and
//! OpenAI share the format); the fallback endpoint selection lives in
//! [`ReasoningConfig`](crate::config::ReasoningConfig).

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::capability::{ParsedTask, RawSuggestion, ReasoningCapability, ReasoningError};
use crate::config::ReasoningConfig;
use crate::models::{Event, SchedulingPreferences, Task};

const SUGGEST_SYSTEM_PROMPT: &str = "\
You are an AI scheduling optimizer. Analyze the user's tasks, existing \
events, and working-hour preferences and propose a time slot for each task.

Rules:
- Never overlap an existing event.
- A slot's length must equal the task's estimated duration in minutes.
- A slot must end no later than the task's due date, when one is set.
- Stay within the user's working hours.

Respond with a JSON array only, one entry per task you can place:
[{\"task_id\": <id>, \"proposed_start\": \"<RFC 3339 UTC>\", \
\"proposed_end\": \"<RFC 3339 UTC>\", \"confidence\": <0..1>}]";

const PARSE_SYSTEM_PROMPT: &str = "\
You are an AI assistant specialized in parsing natural language task \
descriptions. Extract the following fields from the user input:

- title: clear, concise task title
- description: detailed description if provided
- due_date: any time/date reference, as RFC 3339 UTC
- priority: low, medium, high, or urgent (infer from context)
- estimated_duration: duration in minutes if mentioned
- tags: relevant tags/categories

Return JSON only. Use null for anything not provided. Use the supplied \
current time to resolve relative dates.";

/// Maximum title length for the parse-task fallback payload.
const FALLBACK_TITLE_LEN: usize = 100;

/// Reasoning client for Grok / OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct GrokClient {
    client: Client,
    config: ReasoningConfig,
}

impl GrokClient {
    /// Create a new client. The whole-request timeout is set on the
    /// underlying HTTP client from the config.
    pub fn new(config: ReasoningConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, config })
    }

    /// One chat-completions round trip, returning the assistant content.
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
    ) -> Result<String, ReasoningError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReasoningError::Timeout
                } else {
                    ReasoningError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReasoningError::Unavailable(format!(
                "HTTP {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ReasoningError::MalformedResponse("empty choices".to_string()))
    }
}

#[async_trait]
impl ReasoningCapability for GrokClient {
    async fn suggest_schedule(
        &self,
        tasks: &[Task],
        events: &[Event],
        preferences: &SchedulingPreferences,
        now: DateTime<Utc>,
    ) -> Result<Vec<RawSuggestion>, ReasoningError> {
        let context = serde_json::json!({
            "tasks": tasks,
            "events": events,
            "preferences": preferences,
            "current_time": now.to_rfc3339(),
        });

        let messages = vec![
            ChatMessage::system(SUGGEST_SYSTEM_PROMPT),
            ChatMessage::user(format!("Optimize my schedule: {context}")),
        ];

        let content = self.chat(messages, 0.3).await?;
        let suggestions: Vec<RawSuggestion> = serde_json::from_str(strip_code_fence(&content))
            .map_err(|e| ReasoningError::MalformedResponse(e.to_string()))?;

        info!(
            suggestion_count = suggestions.len(),
            "received schedule suggestions"
        );
        Ok(suggestions)
    }

    async fn parse_task(
        &self,
        input: &str,
        now: DateTime<Utc>,
    ) -> Result<ParsedTask, ReasoningError> {
        let messages = vec![
            ChatMessage::system(format!("{PARSE_SYSTEM_PROMPT}\nCurrent time: {now}")),
            ChatMessage::user(format!("Parse this task: {input}")),
        ];

        let content = self.chat(messages, 0.1).await?;
        match serde_json::from_str::<ParsedTask>(strip_code_fence(&content)) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                // Transport succeeded but the payload is unusable; degrade
                // to a minimal task instead of failing task creation.
                error!(error = %e, "failed to parse task response, using fallback");
                Ok(fallback_parsed_task(input))
            }
        }
    }
}

/// Minimal structured task built from the raw input when the model's
/// response cannot be parsed.
fn fallback_parsed_task(input: &str) -> ParsedTask {
    let title: String = input.chars().take(FALLBACK_TITLE_LEN).collect();
    let description = if input.chars().count() > FALLBACK_TITLE_LEN {
        Some(input.to_string())
    } else {
        None
    };
    ParsedTask {
        title,
        description,
        due_date: None,
        priority: Some(crate::models::TaskPriority::Medium),
        estimated_duration: None,
        tags: Vec::new(),
    }
}

/// Strip a Markdown code fence if the model wrapped its JSON in one.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

// ==================== Wire types (OpenAI-compatible) ====================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
