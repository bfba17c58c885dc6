/*!
 * Removal of unwanted words and patterns from cue text.
 *
 * Runs first in the pipeline, before any placeholder protection, so that
 * removed content never reaches a provider. Removal operates line by line
 * and never changes cue count, timestamps, or physical line count: a line
 * reduced to nothing is kept as an empty line.
 */

use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;

use crate::subtitle_processor::SubtitleDocument;

// @const: Collapse runs of spaces/tabs left behind by a removal
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

// @const: Space stranded before punctuation after a removal
static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([.!?,:;])").unwrap());

/// How a removal word is matched against cue text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalKind {
    /// Word-boundary match ("word" never matches inside "password")
    Plain,
    /// Raw substring match, used for markup-like patterns such as `{\an8}`
    Pattern,
}

/// One compiled removal rule
#[derive(Debug)]
struct RemovalRule {
    /// Case-insensitive matcher for this word
    regex: Regex,
    /// How the word was classified
    kind: RemovalKind,
}

/// Strips configured words and patterns from subtitle text
#[derive(Debug, Default)]
pub struct WordRemover {
    /// Compiled rules, one per removal word
    rules: Vec<RemovalRule>,
}

impl WordRemover {
    /// Build a remover from a list of removal words.
    ///
    /// Words containing any non-alphanumeric character (beyond whitespace)
    /// are classified as patterns and matched as literal substrings
    /// anywhere, including mid-token; everything else is matched on word
    /// boundaries. All matching is case-insensitive.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            let kind = Self::classify(word);
            let escaped = regex::escape(word);
            let pattern = match kind {
                RemovalKind::Plain => format!(r"(?i)\b{}\b", escaped),
                RemovalKind::Pattern => format!("(?i){}", escaped),
            };
            match Regex::new(&pattern) {
                Ok(regex) => rules.push(RemovalRule { regex, kind }),
                Err(e) => debug!("Skipping unusable removal word {:?}: {}", word, e),
            }
        }
        WordRemover { rules }
    }

    /// Classify a removal word as plain or pattern
    pub fn classify(word: &str) -> RemovalKind {
        if word.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
            RemovalKind::Pattern
        } else {
            RemovalKind::Plain
        }
    }

    /// Whether any rules are configured
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Remove configured words from a single line of text.
    ///
    /// Idempotent: cleaning an already-clean line returns it unchanged.
    pub fn clean_line(&self, line: &str) -> String {
        if self.rules.is_empty() {
            return line.to_string();
        }

        let mut result = line.to_string();
        for rule in &self.rules {
            result = rule.regex.replace_all(&result, "").into_owned();
        }

        // Tidy the gaps a removal leaves behind
        result = MULTI_SPACE.replace_all(&result, " ").into_owned();
        result = SPACE_BEFORE_PUNCT.replace_all(&result, "$1").into_owned();
        result.trim().to_string()
    }

    /// Remove configured words from every cue of a document in place.
    ///
    /// Line counts are preserved exactly; a fully-removed line stays in
    /// the cue as an empty string so later stages see a stable shape.
    pub fn process_document(&self, document: &mut SubtitleDocument) {
        if self.rules.is_empty() {
            return;
        }
        for entry in &mut document.entries {
            for line in &mut entry.lines {
                *line = self.clean_line(line);
            }
        }
    }

    /// Kinds of the compiled rules, in input order - used by tests
    pub fn rule_kinds(&self) -> Vec<RemovalKind> {
        self.rules.iter().map(|r| r.kind).collect()
    }
}
