use std::time::Duration;
use serde::{Deserialize, Serialize};
use reqwest::Client;
use log::{debug, error};
use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::translation::prompts;
use super::{PromptStyle, TranslationClient, parse_lines_payload};

/// Max tokens requested per messages call
const MAX_TOKENS: u32 = 4096;

/// Client for the Anthropic Claude messages API
pub struct Anthropic {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to the public API)
    endpoint: String,
    /// Model to request
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// Nucleus sampling parameter
    top_p: f32,
}

impl std::fmt::Debug for Anthropic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Anthropic")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

/// Anthropic message request
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    /// The model to use
    model: String,
    /// The messages for the conversation
    messages: Vec<AnthropicMessage>,
    /// System prompt to guide the model
    system: String,
    /// Temperature for generation
    temperature: f32,
    /// Top probability mass to consider (nucleus sampling)
    top_p: f32,
    /// Maximum number of tokens to generate
    max_tokens: u32,
}

/// Anthropic message format
#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    /// Role of the message sender (user, assistant)
    role: String,
    /// Content of the message
    content: String,
}

/// Anthropic response
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    /// The content blocks of the response
    content: Vec<AnthropicContent>,
}

/// Individual content block in an Anthropic response
#[derive(Debug, Deserialize)]
struct AnthropicContent {
    /// The type of content
    #[serde(rename = "type")]
    content_type: String,
    /// The actual text content
    #[serde(default)]
    text: String,
}

impl Anthropic {
    /// Create a new Anthropic client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        top_p: f32,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            temperature,
            top_p,
        }
    }

    /// Complete a messages request and return the concatenated text blocks
    async fn complete(&self, request: AnthropicRequest) -> Result<String, ProviderError> {
        let api_url = if self.endpoint.is_empty() {
            "https://api.anthropic.com/v1/messages".to_string()
        } else {
            format!("{}/v1/messages", self.endpoint.trim_end_matches('/'))
        };

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Anthropic API error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let anthropic_response = response.json::<AnthropicResponse>().await.map_err(|e| {
            ProviderError::MalformedResponse(format!("invalid messages body: {}", e))
        })?;

        let text: String = anthropic_response
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.as_str())
            .collect();
        if text.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "empty message content".to_string(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl TranslationClient for Anthropic {
    async fn translate_lines(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        style: PromptStyle,
    ) -> Result<Vec<String>, ProviderError> {
        let system = match style {
            PromptStyle::Plain => prompts::batch_system_prompt(source_language, target_language),
            PromptStyle::Indexed => {
                prompts::indexed_system_prompt(source_language, target_language)
            }
        };
        let request = AnthropicRequest {
            model: self.model.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: prompts::user_prompt(texts, source_language, target_language),
            }],
            system,
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: MAX_TOKENS,
        };

        debug!(
            "Claude: translating {} texts with model {}",
            texts.len(),
            self.model
        );
        let content = self.complete(request).await?;
        parse_lines_payload(&content)
    }

    fn name(&self) -> &str {
        "Claude"
    }
}
