/*!
 * Job, progress, and event types for the scheduling layer.
 *
 * Job state is exclusively owned and mutated by the job's own task;
 * everything observers see flows out as `ProgressEvent` values.
 */

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::app_config::TranslationSettings;
use crate::processing::MatchingWord;

/// One input file: a name and its raw subtitle bytes.
///
/// The core never touches storage; whoever submits the job loads the
/// bytes and whoever consumes `FileComplete` events persists the output.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Filename used in progress events
    pub name: String,
    /// Raw SRT bytes
    pub data: Vec<u8>,
}

/// Everything needed to run one translation job
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// Files to translate, in submission order
    pub files: Vec<SourceFile>,
    /// Translation settings for every file in the job
    pub settings: TranslationSettings,
    /// Post-translation source -> target substitutions
    pub matching_words: Vec<MatchingWord>,
    /// Words and patterns stripped before translation
    pub removal_words: Vec<String>,
}

/// Lifecycle of a whole job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Submitted, not yet running
    Pending,
    /// Processing files
    Running,
    /// Every file reached a terminal state, no cancellation seen
    Completed,
    /// Cancellation was requested and observed
    Cancelled,
    /// The job was rejected before any file was processed
    Failed,
}

/// Lifecycle of one file within a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Waiting to be scheduled
    Pending,
    /// Cue batches in flight
    Translating,
    /// Translated and composed
    Done,
    /// Failed; siblings are unaffected
    Error,
    /// Stopped by cancellation before completion
    Cancelled,
}

impl FileStatus {
    /// Whether this status is terminal for the file
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error | Self::Cancelled)
    }
}

/// Progress of one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProgress {
    /// Filename this progress belongs to
    pub filename: String,
    /// Total cues in the parsed document
    pub total_cues: usize,
    /// Cues translated so far, monotonically non-decreasing
    pub done_cues: usize,
    /// Current status
    pub status: FileStatus,
    /// Failure detail or soft-error annotation
    pub error_message: Option<String>,
}

impl FileProgress {
    /// Fresh pending progress for a file
    pub fn pending(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            total_cues: 0,
            done_cues: 0,
            status: FileStatus::Pending,
            error_message: None,
        }
    }
}

/// Ordered events emitted while a job runs.
///
/// Serialized with an external `type` tag so any transport can relay the
/// sequence verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Cue-level progress for one file; `current` never decreases
    Progress {
        /// File being translated
        file: String,
        /// Cues completed so far
        current: usize,
        /// Total cues in the file
        total: usize,
    },
    /// One file finished; `output` holds the composed SRT bytes
    FileComplete {
        /// File that finished
        file: String,
        /// Translated document bytes
        output: Vec<u8>,
    },
    /// Every file reached a terminal state without cancellation
    AllComplete {
        /// Files that completed successfully
        files: Vec<String>,
    },
    /// Cancellation observed; file-level when `file` is set, else job-level
    Cancelled {
        /// Affected file, absent for the final job-level event
        #[serde(skip_serializing_if = "Option::is_none")]
        file: Option<String>,
    },
    /// A failure; file-level when `file` is set, else job-level
    Error {
        /// Affected file, absent for job-level errors
        #[serde(skip_serializing_if = "Option::is_none")]
        file: Option<String>,
        /// Human-readable failure description
        message: String,
    },
}

/// Cooperative cancellation flag shared between a job and its callers.
///
/// Setting the flag never interrupts an in-flight provider call; the
/// scheduler checks it before starting each new unit of work.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a fresh, unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Final result of a job run
#[derive(Debug, Clone)]
pub struct JobSummary {
    /// Terminal job status
    pub status: JobStatus,
    /// Final per-file progress, keyed by filename
    pub files: HashMap<String, FileProgress>,
    /// Composed output bytes for files that completed
    pub outputs: HashMap<String, Vec<u8>>,
    /// Filenames that completed, in submission order
    pub completed: Vec<String>,
}
