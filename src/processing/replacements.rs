/*!
 * Post-translation matching-word substitution.
 *
 * Applied after placeholder restoration and before credits handling:
 * each configured source term is replaced by its target term on word
 * boundaries, pairs applied in insertion order, one left-to-right pass
 * per pair with no re-scanning of already-substituted text.
 */

use regex::{NoExpand, Regex};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::subtitle_processor::SubtitleDocument;

/// One source -> target substitution pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchingWord {
    /// Term as it appears after translation
    pub source: String,
    /// Term to put in its place
    pub target: String,
}

/// One compiled replacement rule
#[derive(Debug)]
struct ReplacementRule {
    /// Word-boundary matcher for the source term
    regex: Regex,
    /// Replacement text, inserted literally
    target: String,
}

/// Applies matching-word substitutions to translated text
#[derive(Debug, Default)]
pub struct WordReplacer {
    /// Rules in insertion order
    rules: Vec<ReplacementRule>,
}

impl WordReplacer {
    /// Build a replacer from matching-word pairs.
    ///
    /// Duplicate sources keep the first pair; later duplicates are ignored
    /// so the mapping stays unique by source.
    pub fn new(pairs: &[MatchingWord], case_insensitive: bool) -> Self {
        let mut rules = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        for pair in pairs {
            let source = pair.source.trim();
            if source.is_empty() {
                continue;
            }
            let key = if case_insensitive {
                source.to_lowercase()
            } else {
                source.to_string()
            };
            if seen.contains(&key) {
                debug!("Ignoring duplicate matching word source {:?}", source);
                continue;
            }
            seen.push(key);

            let pattern = if case_insensitive {
                format!(r"(?i)\b{}\b", regex::escape(source))
            } else {
                format!(r"\b{}\b", regex::escape(source))
            };
            match Regex::new(&pattern) {
                Ok(regex) => rules.push(ReplacementRule {
                    regex,
                    target: pair.target.clone(),
                }),
                Err(e) => debug!("Skipping unusable matching word {:?}: {}", source, e),
            }
        }
        WordReplacer { rules }
    }

    /// Whether any rules are configured
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply all rules to one text
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            result = rule
                .regex
                .replace_all(&result, NoExpand(&rule.target))
                .into_owned();
        }
        result
    }

    /// Apply all rules to every line of every cue in place
    pub fn process_document(&self, document: &mut SubtitleDocument) {
        if self.rules.is_empty() {
            return;
        }
        for entry in &mut document.entries {
            for line in &mut entry.lines {
                *line = self.apply(line);
            }
        }
    }
}
