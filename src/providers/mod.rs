/*!
 * Provider implementations for different translation platforms.
 *
 * This module contains client implementations for the supported AI
 * platforms:
 * - OpenAI-compatible: native OpenAI plus Gemini and DeepSeek through
 *   their OpenAI-compatible endpoints
 * - Anthropic: Claude messages API
 *
 * Clients transform batches of texts and know nothing about cues; the
 * factory is the only place that branches on platform identity.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{Platform, TranslationSettings};
use crate::errors::ProviderError;

pub mod anthropic;
pub mod mock;
pub mod openai;

// OpenAI-compatible endpoint base URLs
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";

/// Which instruction set a translation call uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// Plain texts, no alignment aids
    Plain,
    /// Texts carry `[N] ` prefixes the model must preserve
    Indexed,
}

/// Common trait for all translation clients
///
/// Implementations translate an ordered batch of texts and must return
/// the same number of texts in the same order, or fail with a
/// `ProviderError`.
#[async_trait]
pub trait TranslationClient: Send + Sync + Debug {
    /// Translate an ordered batch of texts
    async fn translate_lines(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        style: PromptStyle,
    ) -> Result<Vec<String>, ProviderError>;

    /// Human-readable client name for logs
    fn name(&self) -> &str;
}

/// Build the translation client selected by the job settings.
///
/// This factory is the only platform branch in the crate; everything
/// downstream works against the `TranslationClient` trait.
pub fn create_client(
    settings: &TranslationSettings,
) -> Result<Arc<dyn TranslationClient>, ProviderError> {
    let model = settings.effective_model();
    match settings.platform {
        Platform::OpenAI | Platform::Gemini | Platform::DeepSeek => {
            let base_url = if !settings.endpoint.is_empty() {
                settings.endpoint.clone()
            } else {
                match settings.platform {
                    Platform::OpenAI => OPENAI_BASE_URL.to_string(),
                    Platform::Gemini => GEMINI_BASE_URL.to_string(),
                    Platform::DeepSeek => DEEPSEEK_BASE_URL.to_string(),
                    Platform::Claude => unreachable!(),
                }
            };
            Ok(Arc::new(openai::OpenAICompatible::new(
                settings.platform.display_name(),
                settings.api_key.clone(),
                base_url,
                model,
                settings.temperature,
                settings.top_p,
                settings.timeout_secs,
            )))
        }
        Platform::Claude => Ok(Arc::new(anthropic::Anthropic::new(
            settings.api_key.clone(),
            settings.endpoint.clone(),
            model,
            settings.temperature,
            settings.top_p,
            settings.timeout_secs,
        ))),
    }
}

/// Parse a model response payload into the translated texts.
///
/// Accepts either the requested `{"lines": [...]}` object or a bare JSON
/// array, with optional markdown code fences around it.
pub fn parse_lines_payload(content: &str) -> Result<Vec<String>, ProviderError> {
    let trimmed = strip_code_fence(content.trim());
    let value: serde_json::Value = serde_json::from_str(trimmed).map_err(|e| {
        ProviderError::MalformedResponse(format!("response is not valid JSON: {}", e))
    })?;

    let array = match &value {
        serde_json::Value::Object(map) => map
            .get("lines")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                ProviderError::MalformedResponse("missing \"lines\" array".to_string())
            })?,
        serde_json::Value::Array(items) => items,
        _ => {
            return Err(ProviderError::MalformedResponse(
                "response is neither an object nor an array".to_string(),
            ));
        }
    };

    array
        .iter()
        .map(|item| {
            item.as_str().map(|s| s.to_string()).ok_or_else(|| {
                ProviderError::MalformedResponse("non-string entry in lines array".to_string())
            })
        })
        .collect()
}

/// Strip a surrounding markdown code fence, if any
fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    // Drop an optional language tag on the fence line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").map(str::trim).unwrap_or(content)
}
