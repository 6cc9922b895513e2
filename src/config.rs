//! Configuration for the external reasoning capability.

use std::time::Duration;

const DEFAULT_GROK_API_URL: &str = "https://api.x.ai/v1";
const DEFAULT_GROK_MODEL: &str = "grok-beta";
const FALLBACK_OPENAI_API_URL: &str = "https://api.openai.com/v1";
const FALLBACK_OPENAI_MODEL: &str = "gpt-4-turbo-preview";

/// Settings for the Grok/OpenAI-compatible reasoning endpoint.
#[derive(Debug, Clone)]
pub struct ReasoningConfig {
    /// Base URL of the chat-completions API.
    pub api_url: String,
    /// Bearer token for the API.
    pub api_key: String,
    /// Model name sent with each request.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Default sampling temperature.
    pub temperature: f32,
    /// Whole-request timeout. The orchestrator treats an elapsed timeout as
    /// a capability failure and falls back to deterministic scheduling.
    pub request_timeout: Duration,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GROK_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_GROK_MODEL.to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl ReasoningConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `GROK_API_KEY`: Grok API key (preferred)
    /// - `OPENAI_API_KEY`: fallback key; switches URL and model to OpenAI
    /// - `GROK_API_URL`: API base URL (default: `https://api.x.ai/v1`)
    /// - `AI_MODEL`: model name (default: `grok-beta`)
    /// - `AI_MAX_TOKENS`: generation cap (default: 4000)
    /// - `AI_TEMPERATURE`: sampling temperature (default: 0.7)
    /// - `AI_REQUEST_TIMEOUT_SEC`: request timeout in seconds (default: 5)
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        match std::env::var("GROK_API_KEY") {
            Ok(key) if !key.is_empty() => {
                config.api_key = key;
                if let Ok(url) = std::env::var("GROK_API_URL") {
                    config.api_url = url;
                }
            }
            _ => {
                tracing::warn!("Grok API key not configured, using fallback OpenAI");
                config.api_key = std::env::var("OPENAI_API_KEY")
                    .map_err(|_| "GROK_API_KEY or OPENAI_API_KEY must be set".to_string())?;
                config.api_url = FALLBACK_OPENAI_API_URL.to_string();
                config.model = FALLBACK_OPENAI_MODEL.to_string();
            }
        }

        if let Ok(model) = std::env::var("AI_MODEL") {
            config.model = model;
        }
        if let Some(max_tokens) = std::env::var("AI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            config.max_tokens = max_tokens;
        }
        if let Some(temperature) = std::env::var("AI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
        {
            config.temperature = temperature;
        }
        if let Some(secs) = std::env::var("AI_REQUEST_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
