/*!
 * Error types for the subtrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    MalformedResponse(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Classify an HTTP error status into the matching variant
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError {
                status_code,
                message,
            },
        }
    }
}

/// Errors that can occur while parsing subtitle documents
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The input contained no subtitle blocks at all
    #[error("No subtitle entries found in input")]
    EmptyDocument,

    /// A block did not start with a valid cue index
    #[error("Malformed cue index at line {line}: {found:?}")]
    MalformedIndex {
        /// 1-based line number in the raw input
        line: usize,
        /// The offending text
        found: String,
    },

    /// A timestamp line did not match `HH:MM:SS,mmm --> HH:MM:SS,mmm`
    #[error("Malformed timestamp at line {line}: {found:?}")]
    MalformedTimestamp {
        /// 1-based line number in the raw input
        line: usize,
        /// The offending text
        found: String,
    },

    /// A cue ended before any text line was seen
    #[error("Truncated cue block starting at line {line}")]
    TruncatedBlock {
        /// 1-based line number where the block started
        line: usize,
    },

    /// A cue's end time was not after its start time
    #[error("Invalid time range for cue {seq_num}: end {end_ms}ms <= start {start_ms}ms")]
    InvalidTimeRange {
        /// Cue sequence number
        seq_num: usize,
        /// Start time in milliseconds
        start_ms: u64,
        /// End time in milliseconds
        end_ms: u64,
    },

    /// The input bytes were not valid UTF-8
    #[error("Input is not valid UTF-8: {0}")]
    InvalidEncoding(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider returned a different number of texts than it was given
    #[error("Response shape mismatch: expected {expected} texts, got {actual}")]
    ShapeMismatch {
        /// Number of texts sent
        expected: usize,
        /// Number of texts received
        actual: usize,
    },

    /// A protected placeholder token was lost, duplicated, or mutated
    #[error("Protection violation in cue {cue_index}: {detail}")]
    ProtectionViolation {
        /// 0-based position of the cue within the translation unit
        cue_index: usize,
        /// What went wrong with the token set
        detail: String,
    },

    /// A cue came back with a different number of physical lines
    #[error("Line count changed in cue {cue_index}: expected {expected}, got {actual}")]
    LineCountMismatch {
        /// 0-based position of the cue within the translation unit
        cue_index: usize,
        /// Line count sent
        expected: usize,
        /// Line count received
        actual: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Invalid job configuration, rejected before any file is processed
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
