/*!
 * Placeholder protection for non-translatable spans.
 *
 * Before a cue is sent to a provider, markup tags, character entities, and
 * configured matching-word source terms are swapped for short `§N§`
 * sentinel tokens that language models leave alone. After translation the
 * tokens are swapped back. Token verification is the contract the retry
 * orchestrator escalates on: a missing, duplicated, or stray token is a
 * protection violation, never something to paper over.
 */

use regex::Regex;
use once_cell::sync::Lazy;

use crate::errors::TranslationError;
use crate::subtitle_processor::SubtitleEntry;

// @const: Inline markup tags like <i> or <font color="red">
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

// @const: Named and numeric character entities like &amp; or &#39;
static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[a-zA-Z0-9#]+;").unwrap());

// @const: Anything that looks like one of our sentinel tokens
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"§\d+§").unwrap());

/// What kind of span a token stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Inline markup tag
    Markup,
    /// Named or numeric character entity
    Entity,
    /// Configured matching-word source term
    GlossaryTerm,
}

/// One protected span, scoped to a single cue's translation round-trip
#[derive(Debug, Clone)]
pub struct ProtectedSpan {
    /// The sentinel token substituted into the text
    pub token: String,
    /// The original value the token stands for
    pub original: String,
    /// Span classification
    pub kind: SpanKind,
}

/// A cue prepared for translation: protected text plus its restoration map
#[derive(Debug, Clone)]
pub struct ProtectedCue {
    /// Cue text with spans replaced by tokens, lines joined with `\n`
    pub text: String,
    /// Spans in substitution order
    pub spans: Vec<ProtectedSpan>,
    /// Physical line count the translation must preserve
    pub line_count: usize,
}

/// Replaces non-translatable spans with sentinel tokens and restores them
#[derive(Debug)]
pub struct PlaceholderProtector {
    /// Glossary terms to protect, longest first so longer terms win
    glossary_terms: Vec<String>,
    /// Whether glossary matching ignores case
    case_insensitive: bool,
}

impl PlaceholderProtector {
    /// Build a protector for the given glossary (matching-word source) terms
    pub fn new<I, S>(glossary_terms: I, case_insensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = glossary_terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        terms.dedup();
        PlaceholderProtector {
            glossary_terms: terms,
            case_insensitive,
        }
    }

    /// Protect a whole cue, recording every substituted span
    pub fn protect_cue(&self, entry: &SubtitleEntry) -> ProtectedCue {
        let (text, spans) = self.protect_text(&entry.text());
        ProtectedCue {
            text,
            spans,
            line_count: entry.lines.len(),
        }
    }

    /// Protect one text, returning the tokenized text and its spans.
    ///
    /// Tokens are `§0§`, `§1§`, ... with the counter advanced past any
    /// candidate that already occurs literally in the text, so a token can
    /// never collide with pre-existing content.
    pub fn protect_text(&self, text: &str) -> (String, Vec<ProtectedSpan>) {
        let mut protected = text.to_string();
        let mut spans: Vec<ProtectedSpan> = Vec::new();
        let mut counter = 0usize;

        let mut next_token = |current: &str| -> String {
            loop {
                let candidate = format!("§{}§", counter);
                counter += 1;
                if !current.contains(&candidate) {
                    return candidate;
                }
            }
        };

        // Markup tags, then entities: replace the first remaining match
        // until none are left; tokens themselves can never re-match.
        for (regex, kind) in [(&*TAG_REGEX, SpanKind::Markup), (&*ENTITY_REGEX, SpanKind::Entity)]
        {
            while let Some(m) = regex.find(&protected) {
                let token = next_token(&protected);
                spans.push(ProtectedSpan {
                    token: token.clone(),
                    original: m.as_str().to_string(),
                    kind,
                });
                protected.replace_range(m.range(), &token);
            }
        }

        // Glossary terms, longest first, word-boundary matched. A match
        // inside an already-issued sentinel token is skipped, otherwise a
        // bare numeric term like "9" would rewrite the digit in `§9§`.
        for term in &self.glossary_terms {
            let pattern = if self.case_insensitive {
                format!(r"(?i)\b{}\b", regex::escape(term))
            } else {
                format!(r"\b{}\b", regex::escape(term))
            };
            let Ok(term_regex) = Regex::new(&pattern) else {
                continue;
            };
            loop {
                let token_ranges: Vec<std::ops::Range<usize>> = TOKEN_REGEX
                    .find_iter(&protected)
                    .map(|t| t.range())
                    .collect();
                let Some((range, original)) = term_regex
                    .find_iter(&protected)
                    .find(|m| {
                        !token_ranges
                            .iter()
                            .any(|r| m.start() < r.end && m.end() > r.start)
                    })
                    .map(|m| (m.range(), m.as_str().to_string()))
                else {
                    break;
                };
                let token = next_token(&protected);
                spans.push(ProtectedSpan {
                    token: token.clone(),
                    original,
                    kind: SpanKind::GlossaryTerm,
                });
                protected.replace_range(range, &token);
            }
        }

        (protected, spans)
    }

    /// Substitute tokens back with their original values, in recorded order
    pub fn restore_text(&self, text: &str, spans: &[ProtectedSpan]) -> String {
        let mut restored = text.to_string();
        for span in spans {
            restored = restored.replacen(&span.token, &span.original, 1);
        }
        restored
    }

    /// Verify that a translated text kept its token set intact.
    ///
    /// Every recorded token must appear exactly once, and no sentinel
    /// tokens beyond the recorded set may be present. Anything else is a
    /// protection violation and the caller must escalate, not emit.
    pub fn verify(
        &self,
        translated: &str,
        spans: &[ProtectedSpan],
        cue_index: usize,
    ) -> Result<(), TranslationError> {
        for span in spans {
            let occurrences = translated.matches(span.token.as_str()).count();
            if occurrences == 0 {
                return Err(TranslationError::ProtectionViolation {
                    cue_index,
                    detail: format!("token {} is missing", span.token),
                });
            }
            if occurrences > 1 {
                return Err(TranslationError::ProtectionViolation {
                    cue_index,
                    detail: format!("token {} appears {} times", span.token, occurrences),
                });
            }
        }

        let found = TOKEN_REGEX.find_iter(translated).count();
        if found != spans.len() {
            return Err(TranslationError::ProtectionViolation {
                cue_index,
                detail: format!(
                    "expected {} sentinel tokens, found {}",
                    spans.len(),
                    found
                ),
            });
        }
        Ok(())
    }
}
