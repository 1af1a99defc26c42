//! Text-generation provider abstraction and implementations.
//!
//! Defines the [`TextGenerator`] trait and two concrete implementations:
//! - **[`DisabledGenerator`]** — returns errors; used when no provider is
//!   configured, so the server still boots without an API key.
//! - **[`OpenAiGenerator`]** — calls the OpenAI chat completions API.
//!
//! The generation call is a single round trip: one request, one response,
//! no streaming. Failures are terminal for the request that triggered them
//! and are never retried internally. The configured `timeout_secs` bounds
//! how long a caller waits on the external service.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::GenerationConfig;

/// Trait for text-generation backends.
///
/// `system_prompt` describes the task, `user_prompt` carries the template
/// text and caller data (see [`crate::prompt`]).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the model identifier (e.g. `"gpt-4"`).
    fn model_name(&self) -> &str;

    /// Generates text for the given prompts.
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

// ============ Disabled Generator ============

/// A no-op generator that always returns errors.
///
/// Used when `generation.provider = "disabled"` in the configuration.
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        bail!("Generation provider is disabled; set generation.provider = \"openai\" and OPENAI_API_KEY")
    }
}

// ============ OpenAI Generator ============

/// Generator backed by the OpenAI chat completions API.
///
/// Calls `POST /v1/chat/completions` with the configured model, temperature,
/// and max_tokens. Requires the `OPENAI_API_KEY` environment variable.
pub struct OpenAiGenerator {
    config: GenerationConfig,
    client: reqwest::Client,
}

impl OpenAiGenerator {
    /// Create a new OpenAI generator from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is not in the environment or
    /// the HTTP client cannot be built.
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        if std::env::var("OPENAI_API_KEY").is_err() {
            bail!("OPENAI_API_KEY environment variable not set");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config: config.clone(),
            client,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY not set"))?;

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("OpenAI API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        parse_chat_response(&json)
    }
}

/// Extracts `choices[0].message.content` from a chat completions response.
fn parse_chat_response(json: &serde_json::Value) -> Result<String> {
    let content = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing message content"))?;
    Ok(content.to_string())
}

/// Create the appropriate [`TextGenerator`] based on configuration.
///
/// # Errors
///
/// Returns an error for unknown provider names or if the OpenAI generator
/// cannot be initialized (missing API key).
pub fn create_generator(config: &GenerationConfig) -> Result<Box<dyn TextGenerator>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledGenerator)),
        "openai" => Ok(Box::new(OpenAiGenerator::new(config)?)),
        other => bail!("Unknown generation provider: {}", other),
    }
}
