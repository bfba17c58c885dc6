use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::warn;

use crate::errors::SubtitleError;

// @module: SRT document parsing and composition

// @const: SRT timestamp regex (whole line, both cue times)
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})$").unwrap()
});

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Physical text lines, order preserved
    pub lines: Vec<String>,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry without validation - used by tests and builders
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, lines: Vec<String>) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            lines,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range
    pub fn new_validated(
        seq_num: usize,
        start_time_ms: u64,
        end_time_ms: u64,
        lines: Vec<String>,
    ) -> Result<Self, SubtitleError> {
        if end_time_ms <= start_time_ms {
            return Err(SubtitleError::InvalidTimeRange {
                seq_num,
                start_ms: start_time_ms,
                end_ms: end_time_ms,
            });
        }
        Ok(SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            lines,
        })
    }

    /// The cue text as a single string, lines joined with newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the cue text from a single string, splitting on newlines
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(|l| l.to_string()).collect();
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm`) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        let parts: Vec<&str> = timestamp.split(&[':', ','][..]).collect();
        if parts.len() != 4 {
            return Err(SubtitleError::MalformedTimestamp {
                line: 0,
                found: timestamp.to_string(),
            });
        }

        let as_u64 = |s: &str| -> Result<u64, SubtitleError> {
            s.parse().map_err(|_| SubtitleError::MalformedTimestamp {
                line: 0,
                found: timestamp.to_string(),
            })
        };
        let hours = as_u64(parts[0])?;
        let minutes = as_u64(parts[1])?;
        let seconds = as_u64(parts[2])?;
        let millis = as_u64(parts[3])?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(SubtitleError::MalformedTimestamp {
                line: 0,
                found: timestamp.to_string(),
            });
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

/// An ordered sequence of subtitle cues
#[derive(Debug, Clone, Default)]
pub struct SubtitleDocument {
    /// Cues in chronological order
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleDocument {
    /// Create a document from already-built entries
    pub fn new(entries: Vec<SubtitleEntry>) -> Self {
        SubtitleDocument { entries }
    }

    /// Parse raw SRT bytes into a document.
    ///
    /// The parser is strict about block structure: each block is an index
    /// line, a timestamp line, and at least one text line, separated from
    /// the next block by one or more blank lines. Anything else is a
    /// `SubtitleError` for this document.
    pub fn parse(raw: &[u8]) -> Result<Self, SubtitleError> {
        let content = std::str::from_utf8(raw)
            .map_err(|e| SubtitleError::InvalidEncoding(e.to_string()))?;
        // Strip a UTF-8 BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        Self::parse_str(content)
    }

    /// Parse SRT text into a document
    pub fn parse_str(content: &str) -> Result<Self, SubtitleError> {
        let lines: Vec<&str> = content.lines().map(|l| l.trim_end_matches('\r')).collect();
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < lines.len() {
            // Skip blank separator lines
            if lines[pos].trim().is_empty() {
                pos += 1;
                continue;
            }
            let block_start = pos + 1;

            // Index line
            let index_text = lines[pos].trim();
            let seq_num: usize = index_text.parse().map_err(|_| SubtitleError::MalformedIndex {
                line: block_start,
                found: index_text.to_string(),
            })?;
            if seq_num == 0 {
                return Err(SubtitleError::MalformedIndex {
                    line: block_start,
                    found: index_text.to_string(),
                });
            }
            pos += 1;

            // Timestamp line
            if pos >= lines.len() {
                return Err(SubtitleError::TruncatedBlock { line: block_start });
            }
            let ts_text = lines[pos].trim();
            let caps = TIMESTAMP_REGEX
                .captures(ts_text)
                .ok_or_else(|| SubtitleError::MalformedTimestamp {
                    line: pos + 1,
                    found: ts_text.to_string(),
                })?;
            let start_ms = Self::capture_to_ms(&caps, 1);
            let end_ms = Self::capture_to_ms(&caps, 5);
            pos += 1;

            // Text lines until the next blank line or EOF
            let mut text_lines = Vec::new();
            while pos < lines.len() && !lines[pos].trim().is_empty() {
                text_lines.push(lines[pos].to_string());
                pos += 1;
            }
            if text_lines.is_empty() {
                return Err(SubtitleError::TruncatedBlock { line: block_start });
            }

            entries.push(SubtitleEntry::new_validated(
                seq_num, start_ms, end_ms, text_lines,
            )?);
        }

        if entries.is_empty() {
            return Err(SubtitleError::EmptyDocument);
        }

        // Chronological order is the document invariant, not file order
        let mut overlap_count = 0;
        entries.sort_by_key(|entry| entry.start_time_ms);
        for i in 0..entries.len().saturating_sub(1) {
            if entries[i].end_time_ms > entries[i + 1].start_time_ms {
                overlap_count += 1;
            }
        }
        if overlap_count > 0 {
            warn!("Found {} overlapping subtitle entries", overlap_count);
        }

        let mut document = SubtitleDocument { entries };
        document.renumber();
        Ok(document)
    }

    /// Compose the document back into canonical SRT bytes.
    ///
    /// Indices are renumbered 1..N, timestamps use `HH:MM:SS,mmm`, and
    /// every physical text line of each cue is written out, including
    /// lines the pipeline emptied.
    pub fn compose(mut self) -> Vec<u8> {
        self.renumber();
        let mut output = String::new();
        for entry in &self.entries {
            output.push_str(&entry.to_string());
        }
        output.into_bytes()
    }

    /// Restore chronological order and contiguous 1..N indices
    pub fn renumber(&mut self) {
        self.entries.sort_by_key(|entry| entry.start_time_ms);
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }
    }

    /// Number of cues in the document
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no cues
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert one captured timestamp (4 capture groups) to milliseconds
    fn capture_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
        let field = |idx: usize| -> u64 {
            caps.get(idx).map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };
        (field(start_idx) * 3600 + field(start_idx + 1) * 60 + field(start_idx + 2)) * 1000
            + field(start_idx + 3)
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Document")?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
