//! Chat-completions client for OpenRouter-compatible APIs

use crate::config::LlmConfig;
use crate::llm::prompt::build_prompt;
use crate::llm::TextService;
use crate::GleanError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
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

/// Handle to the language model service
///
/// Acquired with `LlmService::new` and released when dropped, which closes
/// the underlying connection pool on every exit path. Extraction and
/// summarization only borrow it.
pub struct LlmService {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl LlmService {
    /// Opens a service handle
    ///
    /// # Errors
    ///
    /// `Configuration` if no API key is configured or the client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, GleanError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                GleanError::Configuration(
                    "OPENROUTER_API_KEY is required to use the LLM service".to_string(),
                )
            })?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GleanError::Configuration(format!("Failed to build LLM client: {}", e)))?;

        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        tracing::debug!("Opened LLM service at {} (model {})", endpoint, config.model);

        Ok(Self {
            client,
            api_key,
            endpoint,
            model: config.model.clone(),
        })
    }

    /// The default model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, prompt: &str, model: &str) -> Result<String, GleanError> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GleanError::Service(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(GleanError::Service(format!(
                "HTTP {} from {}: {}",
                status.as_u16(),
                self.endpoint,
                snippet
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GleanError::Service(format!("Invalid completion payload: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| GleanError::Service("Completion contained no message".to_string()))
    }
}

#[async_trait]
impl TextService for LlmService {
    async fn complete(
        &self,
        instruction: &str,
        text: &str,
        model: Option<&str>,
    ) -> Result<String, GleanError> {
        let prompt = build_prompt(instruction, text);
        self.chat(&prompt, model.unwrap_or(self.model.as_str())).await
    }
}

impl Drop for LlmService {
    fn drop(&mut self) {
        tracing::debug!("Closing LLM service at {}", self.endpoint);
    }
}
