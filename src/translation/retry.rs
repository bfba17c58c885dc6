/*!
 * Three-tier retry orchestration for translation units.
 *
 * A translation unit is a batch of protected cue texts. The ladder is
 * Batch -> Indexed -> Line-by-line: each tier's output must keep the
 * unit's shape (text count), every cue's sentinel token set, and every
 * cue's physical line count, or the orchestrator escalates. The ladder is
 * a hard ceiling - at the bottom tier a cue that still cannot be
 * translated keeps its original protected text as a soft error and the
 * unit carries on.
 */

use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};
use std::sync::Arc;

use crate::errors::TranslationError;
use crate::processing::placeholders::{PlaceholderProtector, ProtectedCue};
use crate::providers::{PromptStyle, TranslationClient};

// @const: Alignment prefix added at the indexed tier
static INDEX_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\d+\]\s?").unwrap());

/// Which tier produced a unit's translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Whole unit in one plain provider call
    Batch,
    /// Whole unit with embedded alignment indices
    Indexed,
    /// Each cue translated in isolation
    LineByLine,
}

/// Result of translating one unit
#[derive(Debug)]
pub struct UnitOutcome {
    /// Translated protected texts, same order and count as the input cues
    pub texts: Vec<String>,
    /// Cues that kept their original protected text after the ladder
    pub soft_errors: usize,
    /// Tier that produced the accepted output
    pub tier: Tier,
}

/// Escalates through translation strategies until a unit is translated
pub struct RetryOrchestrator {
    /// Provider client selected for the job
    client: Arc<dyn TranslationClient>,
    /// Protector whose token contract the output must honor
    protector: Arc<PlaceholderProtector>,
    /// Source language code
    source_language: String,
    /// Target language code
    target_language: String,
}

impl RetryOrchestrator {
    /// Create an orchestrator for a job's client and languages
    pub fn new(
        client: Arc<dyn TranslationClient>,
        protector: Arc<PlaceholderProtector>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            client,
            protector,
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Translate one unit of protected cues through the tier ladder.
    ///
    /// Never fails the unit: provider errors and shape violations
    /// escalate tier by tier, and the bottom tier falls back to original
    /// text per cue.
    pub async fn translate_unit(&self, cues: &[ProtectedCue]) -> UnitOutcome {
        if cues.is_empty() {
            return UnitOutcome {
                texts: Vec::new(),
                soft_errors: 0,
                tier: Tier::Batch,
            };
        }

        // Nothing translatable: pass the unit through untouched
        if cues.iter().all(|c| c.text.trim().is_empty()) {
            return UnitOutcome {
                texts: cues.iter().map(|c| c.text.clone()).collect(),
                soft_errors: 0,
                tier: Tier::Batch,
            };
        }

        match self.attempt_batch(cues).await {
            Ok(texts) => {
                return UnitOutcome {
                    texts,
                    soft_errors: 0,
                    tier: Tier::Batch,
                };
            }
            Err(e) => debug!("Batch tier failed, escalating to indexed: {}", e),
        }

        match self.attempt_indexed(cues).await {
            Ok(texts) => {
                return UnitOutcome {
                    texts,
                    soft_errors: 0,
                    tier: Tier::Indexed,
                };
            }
            Err(e) => debug!("Indexed tier failed, escalating to line-by-line: {}", e),
        }

        self.attempt_line_by_line(cues).await
    }

    /// Tier 1: the whole unit in a single plain call
    async fn attempt_batch(&self, cues: &[ProtectedCue]) -> Result<Vec<String>, TranslationError> {
        let texts: Vec<String> = cues.iter().map(|c| c.text.clone()).collect();
        let translated = self
            .client
            .translate_lines(
                &texts,
                &self.source_language,
                &self.target_language,
                PromptStyle::Plain,
            )
            .await?;
        self.validate(cues, translated)
    }

    /// Tier 2: the whole unit with `[N] ` alignment prefixes
    async fn attempt_indexed(
        &self,
        cues: &[ProtectedCue],
    ) -> Result<Vec<String>, TranslationError> {
        let texts: Vec<String> = cues
            .iter()
            .enumerate()
            .map(|(i, c)| format!("[{}] {}", i + 1, c.text))
            .collect();
        let translated = self
            .client
            .translate_lines(
                &texts,
                &self.source_language,
                &self.target_language,
                PromptStyle::Indexed,
            )
            .await?;
        let stripped: Vec<String> = translated
            .iter()
            .map(|t| INDEX_PREFIX.replace(t, "").into_owned())
            .collect();
        self.validate(cues, stripped)
    }

    /// Tier 3: each cue alone; failures keep the original protected text
    async fn attempt_line_by_line(&self, cues: &[ProtectedCue]) -> UnitOutcome {
        let mut texts = Vec::with_capacity(cues.len());
        let mut soft_errors = 0;

        for (idx, cue) in cues.iter().enumerate() {
            if cue.text.trim().is_empty() {
                texts.push(cue.text.clone());
                continue;
            }

            let single = std::slice::from_ref(&cue.text);
            let result = self
                .client
                .translate_lines(
                    single,
                    &self.source_language,
                    &self.target_language,
                    PromptStyle::Plain,
                )
                .await
                .map_err(TranslationError::from)
                .and_then(|out| self.validate(std::slice::from_ref(cue), out));

            match result {
                Ok(mut out) => texts.push(out.remove(0)),
                Err(e) => {
                    warn!(
                        "Cue {} failed at line-by-line tier, keeping original text: {}",
                        idx, e
                    );
                    texts.push(cue.text.clone());
                    soft_errors += 1;
                }
            }
        }

        UnitOutcome {
            texts,
            soft_errors,
            tier: Tier::LineByLine,
        }
    }

    /// Validate one tier's output against the unit's shape contract
    fn validate(
        &self,
        cues: &[ProtectedCue],
        translated: Vec<String>,
    ) -> Result<Vec<String>, TranslationError> {
        if translated.len() != cues.len() {
            return Err(TranslationError::ShapeMismatch {
                expected: cues.len(),
                actual: translated.len(),
            });
        }

        for (idx, (cue, text)) in cues.iter().zip(translated.iter()).enumerate() {
            let line_count = text.split('\n').count();
            if line_count != cue.line_count {
                return Err(TranslationError::LineCountMismatch {
                    cue_index: idx,
                    expected: cue.line_count,
                    actual: line_count,
                });
            }
            self.protector.verify(text, &cue.spans, idx)?;
        }

        Ok(translated)
    }
}
