use std::time::Duration;
use serde::{Deserialize, Serialize};
use reqwest::Client;
use log::{debug, error};
use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::translation::prompts;
use super::{PromptStyle, TranslationClient, parse_lines_payload};

/// Client for OpenAI-compatible chat completion APIs.
///
/// Serves native OpenAI as well as Gemini and DeepSeek, which both expose
/// OpenAI-compatible endpoints; only the base URL differs.
pub struct OpenAICompatible {
    /// HTTP client for API requests
    client: Client,
    /// Platform name for logs
    platform_name: String,
    /// API key for authentication
    api_key: String,
    /// Base URL of the chat completions endpoint
    base_url: String,
    /// Model to request
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// Nucleus sampling parameter
    top_p: f32,
}

impl std::fmt::Debug for OpenAICompatible {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAICompatible")
            .field("platform", &self.platform_name)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Chat message for the completions request
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Chat completions request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    /// The model to use
    model: String,
    /// The conversation messages
    messages: Vec<ChatMessage>,
    /// Temperature for generation
    temperature: f32,
    /// Top probability mass to consider (nucleus sampling)
    top_p: f32,
    /// Ask for a JSON object response
    response_format: ResponseFormat,
}

/// Response format selector for structured output
#[derive(Debug, Serialize)]
struct ResponseFormat {
    /// Format type, always "json_object"
    #[serde(rename = "type")]
    format_type: String,
}

/// One returned completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    /// The generated message
    message: ChatMessage,
}

/// Chat completions response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    /// Generated choices, first one carries the payload
    choices: Vec<ChatChoice>,
}

impl OpenAICompatible {
    /// Create a new OpenAI-compatible client
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        platform_name: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
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
            platform_name: platform_name.into(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            temperature,
            top_p,
        }
    }

    /// Send one chat completions request and return the content text
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let api_url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
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
            error!("{} API error ({}): {}", self.platform_name, status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let chat_response = response.json::<ChatResponse>().await.map_err(|e| {
            ProviderError::MalformedResponse(format!("invalid completions body: {}", e))
        })?;

        let content = chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "empty completion content".to_string(),
            ));
        }
        Ok(content)
    }
}

#[async_trait]
impl TranslationClient for OpenAICompatible {
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
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompts::user_prompt(texts, source_language, target_language),
                },
            ],
            temperature: self.temperature,
            top_p: self.top_p,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        debug!(
            "{}: translating {} texts with model {}",
            self.platform_name,
            texts.len(),
            self.model
        );
        let content = self.complete(request).await?;
        parse_lines_payload(&content)
    }

    fn name(&self) -> &str {
        &self.platform_name
    }
}
