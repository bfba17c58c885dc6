/*!
 * Detection, replacement, and timing-aware insertion of translator credits.
 *
 * Runs last in the pipeline, on the fully translated and restored cue
 * sequence. Existing credit lines are recognized in a bounded window at
 * both ends of the document; new credits go into the largest qualifying
 * timing gap, or after the last cue when forced or when no gap qualifies.
 */

use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, info};

use crate::subtitle_processor::{SubtitleDocument, SubtitleEntry};

/// Cues inspected for an existing credit line at each end of the document
const CREDIT_SCAN_WINDOW: usize = 5;

/// Minimum gap between adjacent cues that can host an inserted credit
const MIN_GAP_MS: u64 = 5_000;

/// Offset of an inserted credit from the previous cue's end
const CREDIT_OFFSET_MS: u64 = 500;

/// Duration of an inserted credit cue
const CREDIT_DURATION_MS: u64 = 3_000;

/// Delay before a credit appended after the final cue
const APPEND_DELAY_MS: u64 = 1_000;

// @const: Credit line patterns, English and Greek, case-insensitive
static CREDIT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\btranslated?\s+by\b",
        r"(?i)\bsubtitles?\s+by\b",
        r"(?i)\bsubs?\s+by\b",
        r"(?i)\btranslator\s*:",
        r"(?i)\btranslation\s*:",
        r"(?i)\bsubtitle\s*:",
        r"(?i)\bμετάφραση\b",
        r"(?i)\bυπότιτλο[ιστ]\b",
        r"(?i)\bμεταφραστή[ςσ]\b",
        r"(?i)\bμετέφρασε\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Handles translator credit lines in subtitle documents
#[derive(Debug, Clone)]
pub struct CreditsManager {
    /// Name stamped into credit text
    translator_name: String,
}

impl CreditsManager {
    /// Create a manager producing credits for the given translator name
    pub fn new(translator_name: impl Into<String>) -> Self {
        CreditsManager {
            translator_name: translator_name.into(),
        }
    }

    /// The credit text this manager writes
    pub fn credit_text(&self) -> String {
        format!("Translated by {} with AI", self.translator_name)
    }

    /// Whether a line looks like a translator credit
    pub fn is_credit_line(text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        CREDIT_PATTERNS.iter().any(|p| p.is_match(text))
    }

    /// Apply the configured credit policy to a document.
    ///
    /// Replacement is attempted first when enabled; insertion only happens
    /// when enabled and nothing was replaced. Indices are contiguous 1..N
    /// in chronological order afterwards either way.
    pub fn apply(
        &self,
        document: &mut SubtitleDocument,
        replace_credits: bool,
        add_credits: bool,
        append_at_end: bool,
    ) {
        let replaced = replace_credits && self.replace_existing(document);
        if add_credits && !replaced {
            self.insert_credit(document, append_at_end);
        }
        document.renumber();
    }

    /// Rewrite existing credit lines inside the scan windows in place.
    ///
    /// Returns true when at least one line was rewritten. Timing and cue
    /// count never change here.
    pub fn replace_existing(&self, document: &mut SubtitleDocument) -> bool {
        let len = document.entries.len();
        if len == 0 {
            return false;
        }
        let head = CREDIT_SCAN_WINDOW.min(len);
        let tail_start = len.saturating_sub(CREDIT_SCAN_WINDOW).max(head);

        let replacement = self.credit_text();
        let mut replaced = false;
        let indices = (0..head).chain(tail_start..len);
        for idx in indices {
            let entry = &mut document.entries[idx];
            for line in &mut entry.lines {
                if Self::is_credit_line(line) {
                    debug!("Rewriting credit line in cue {}: {:?}", entry.seq_num, line);
                    *line = replacement.clone();
                    replaced = true;
                }
            }
        }
        replaced
    }

    /// Insert a new credit cue, preferring the largest qualifying gap
    pub fn insert_credit(&self, document: &mut SubtitleDocument, append_at_end: bool) {
        if document.entries.is_empty() {
            return;
        }

        if !append_at_end {
            if let Some((position, gap_ms)) = Self::find_largest_gap(document) {
                let prev_end = document.entries[position].end_time_ms;
                let next_start = document.entries[position + 1].start_time_ms;
                let start = prev_end + CREDIT_OFFSET_MS;
                let end = (start + CREDIT_DURATION_MS).min(next_start);
                info!(
                    "Inserting credits in {:.1}s gap after cue {}",
                    gap_ms as f64 / 1000.0,
                    document.entries[position].seq_num
                );
                document.entries.insert(
                    position + 1,
                    SubtitleEntry::new(0, start, end, vec![self.credit_text()]),
                );
                return;
            }
            info!("No gap of at least {}s found, appending credits at the end", MIN_GAP_MS / 1000);
        }

        let last_end = document
            .entries
            .iter()
            .map(|e| e.end_time_ms)
            .max()
            .unwrap_or(0);
        let start = last_end + APPEND_DELAY_MS;
        document.entries.push(SubtitleEntry::new(
            0,
            start,
            start + CREDIT_DURATION_MS,
            vec![self.credit_text()],
        ));
    }

    /// Largest gap of at least `MIN_GAP_MS` between adjacent cues.
    ///
    /// Returns the index of the cue before the gap and the gap width.
    fn find_largest_gap(document: &SubtitleDocument) -> Option<(usize, u64)> {
        let mut best: Option<(usize, u64)> = None;
        for i in 0..document.entries.len().saturating_sub(1) {
            let current_end = document.entries[i].end_time_ms;
            let next_start = document.entries[i + 1].start_time_ms;
            let gap = next_start.saturating_sub(current_end);
            if gap < MIN_GAP_MS {
                continue;
            }
            if best.is_none_or(|(_, widest)| gap > widest) {
                best = Some((i, gap));
            }
        }
        best
    }
}
