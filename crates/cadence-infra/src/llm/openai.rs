//! OpenAI-compatible chat completion backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use cadence_core::error::GenerationError;
use cadence_core::ports::TextGenerator;

/// Configuration for the chat completion endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Missing key means generation is not configured.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Upper bound for one completion request.
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.8,
            timeout: Duration::from_secs(30),
        }
    }
}

impl OpenAiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            temperature: std::env::var("OPENAI_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.temperature),
            timeout: std::env::var("GENERATION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// [`TextGenerator`] over an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiTextGenerator {
    http_client: Client,
    config: OpenAiConfig,
}

impl OpenAiTextGenerator {
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Configuration(e.to_string()))?;

        if config.api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set - content generation will be unavailable");
        }

        Ok(Self {
            http_client,
            config,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            GenerationError::Configuration("no API key configured for text generation".into())
        })?;

        let start = std::time::Instant::now();
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("request timed out after {:?}", self.config.timeout)
                } else {
                    e.to_string()
                };
                tracing::warn!(error = %message, "Text generation request failed");
                GenerationError::Upstream {
                    status: None,
                    message,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, error = %error_text, "Text generation API error");
            return Err(GenerationError::Upstream {
                status: Some(status.as_u16()),
                message: error_text,
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| GenerationError::Upstream {
            status: Some(status.as_u16()),
            message: format!("unreadable completion response: {e}"),
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GenerationError::Upstream {
                status: Some(status.as_u16()),
                message: "completion response contained no choices".into(),
            })?;

        tracing::debug!(
            model = %self.config.model,
            duration_ms = start.elapsed().as_millis() as u64,
            chars = content.len(),
            "Text generation completed"
        );

        Ok(content)
    }
}
