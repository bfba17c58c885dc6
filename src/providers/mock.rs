/*!
 * Mock translation clients for testing.
 *
 * The mock translates by suffixing every non-empty line with the target
 * language tag, which keeps line counts and sentinel tokens intact, and
 * records every call so tests can assert on tier escalation and on calls
 * that must never happen after cancellation.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::errors::ProviderError;
use super::{PromptStyle, TranslationClient};

/// One recorded call against the mock
#[derive(Debug, Clone)]
pub struct MockCall {
    /// Texts handed to the client
    pub texts: Vec<String>,
    /// Prompt style of the call
    pub style: PromptStyle,
}

/// Behavior mode for the mock client
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Always fails with an API error
    Failing,
    /// Drops the last text from every multi-text response (shape mismatch)
    DropLast,
    /// Strips sentinel tokens from the translation (protection violation)
    CorruptTokens,
    /// Plain calls mismatch, indexed calls succeed
    PlainMismatchIndexedOk,
    /// Multi-text calls mismatch at both prompt styles; single-text calls
    /// fail when the text contains the marker, succeed otherwise
    MismatchBatchesFailMarker {
        /// Substring that makes a single-text call fail
        marker: String,
    },
    /// Succeeds after a delay, for cancellation timing tests
    Slow {
        /// Delay before responding
        delay_ms: u64,
    },
}

/// Mock translation client with scripted behavior
#[derive(Debug, Clone)]
pub struct MockClient {
    /// Behavior mode
    behavior: MockBehavior,
    /// Record of every call made, shared across clones
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockClient {
    /// Create a mock with the given behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// All calls recorded so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Number of calls recorded so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// The translation the working mock produces for one text
    pub fn translate_text(text: &str, target_language: &str) -> String {
        text.split('\n')
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{} [{}]", line, target_language)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl TranslationClient for MockClient {
    async fn translate_lines(
        &self,
        texts: &[String],
        _source_language: &str,
        target_language: &str,
        style: PromptStyle,
    ) -> Result<Vec<String>, ProviderError> {
        self.calls.lock().push(MockCall {
            texts: texts.to_vec(),
            style,
        });

        let translate_all = || {
            texts
                .iter()
                .map(|t| Self::translate_text(t, target_language))
                .collect::<Vec<_>>()
        };

        match &self.behavior {
            MockBehavior::Working => Ok(translate_all()),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::DropLast => {
                let mut result = translate_all();
                result.pop();
                Ok(result)
            }

            MockBehavior::CorruptTokens => Ok(translate_all()
                .into_iter()
                .map(|t| t.replace('§', ""))
                .collect()),

            MockBehavior::PlainMismatchIndexedOk => match style {
                PromptStyle::Plain => {
                    let mut result = translate_all();
                    result.pop();
                    Ok(result)
                }
                PromptStyle::Indexed => Ok(translate_all()),
            },

            MockBehavior::MismatchBatchesFailMarker { marker } => {
                if texts.len() > 1 {
                    let mut result = translate_all();
                    result.pop();
                    Ok(result)
                } else if texts.iter().any(|t| t.contains(marker.as_str())) {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated failure on marker {:?}", marker),
                    })
                } else {
                    Ok(translate_all())
                }
            }

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                Ok(translate_all())
            }
        }
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
