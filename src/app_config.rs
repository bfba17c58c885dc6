use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::Path;

use crate::processing::MatchingWord;

/// Application configuration module
/// This module handles translation settings including loading,
/// validating and saving configuration files.
/// AI platform behind the translation capability
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    // @platform: OpenAI chat completions
    #[default]
    OpenAI,
    // @platform: Google Gemini via the OpenAI-compatible endpoint
    Gemini,
    // @platform: DeepSeek via the OpenAI-compatible endpoint
    DeepSeek,
    // @platform: Anthropic Claude messages API
    Claude,
}

impl Platform {
    // @returns: Capitalized platform name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Gemini => "Gemini",
            Self::DeepSeek => "DeepSeek",
            Self::Claude => "Claude",
        }
    }

    /// Default model served by this platform
    pub fn default_model(&self) -> &str {
        match self {
            Self::OpenAI => "gpt-4o-mini",
            Self::Gemini => "gemini-2.0-flash",
            Self::DeepSeek => "deepseek-chat",
            Self::Claude => "claude-3-5-haiku-latest",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
            Self::DeepSeek => "deepseek",
            Self::Claude => "claude",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "gemini" => Ok(Self::Gemini),
            "deepseek" => Ok(Self::DeepSeek),
            "claude" => Ok(Self::Claude),
            _ => Err(anyhow!("Invalid platform: {}", s)),
        }
    }
}

/// Settings for one translation job
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationSettings {
    /// AI platform to translate with
    #[serde(default)]
    pub platform: Platform,

    /// Model name; empty means the platform default
    #[serde(default = "String::new")]
    pub model: String,

    /// API key for the platform
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Optional endpoint override (self-hosted or proxy)
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling parameter
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Name stamped into credit lines
    #[serde(default = "default_translator_name")]
    pub translator_name: String,

    /// Whether matching-word lookups ignore case
    #[serde(default)]
    pub matching_case_insensitive: bool,

    /// Rewrite existing translator-credit lines
    #[serde(default = "default_true")]
    pub replace_credits: bool,

    /// Insert a new credit cue when none was replaced
    #[serde(default = "default_true")]
    pub add_credits: bool,

    /// Force the credit cue after the last cue instead of a timing gap
    #[serde(default)]
    pub append_credits_at_end: bool,

    /// Max in-flight provider calls per file
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Files processed in parallel within one job
    #[serde(default = "default_file_parallelism")]
    pub file_parallelism: usize,

    /// Max cues grouped into one provider call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_temperature() -> f32 {
    0.2
}

fn default_top_p() -> f32 {
    0.1
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "el".to_string()
}

fn default_translator_name() -> String {
    "AI".to_string()
}

fn default_true() -> bool {
    true
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_file_parallelism() -> usize {
    1
}

fn default_batch_size() -> usize {
    20
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            model: String::new(),
            api_key: String::new(),
            endpoint: String::new(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            translator_name: default_translator_name(),
            matching_case_insensitive: false,
            replace_credits: true,
            add_credits: true,
            append_credits_at_end: false,
            concurrent_requests: default_concurrent_requests(),
            file_parallelism: default_file_parallelism(),
            batch_size: default_batch_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TranslationSettings {
    /// Model to send to the provider, falling back to the platform default
    pub fn effective_model(&self) -> String {
        if self.model.is_empty() {
            self.platform.default_model().to_string()
        } else {
            self.model.clone()
        }
    }

    /// Validate settings before any file processing starts.
    ///
    /// A failure here aborts the whole job: bad settings are never
    /// discovered halfway through a batch of files.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() && self.endpoint.is_empty() {
            return Err(anyhow!(
                "API key is required for {} (or set a custom endpoint)",
                self.platform.display_name()
            ));
        }
        validate_language_code(&self.source_language)?;
        validate_language_code(&self.target_language)?;
        if self.source_language.eq_ignore_ascii_case(&self.target_language) {
            return Err(anyhow!(
                "Source and target language are both '{}'",
                self.source_language
            ));
        }
        if self.concurrent_requests == 0 {
            return Err(anyhow!("concurrent_requests must be at least 1"));
        }
        if self.file_parallelism == 0 {
            return Err(anyhow!("file_parallelism must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(anyhow!("batch_size must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(anyhow!("temperature must be within 0.0..=2.0"));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(anyhow!("top_p must be within 0.0..=1.0"));
        }
        if self.translator_name.trim().is_empty() {
            return Err(anyhow!("translator_name must not be empty"));
        }
        Ok(())
    }
}

/// Check that a language code resolves to a known ISO 639 language
fn validate_language_code(code: &str) -> Result<()> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Language code must not be empty"));
    }
    let known = match trimmed.len() {
        2 => isolang::Language::from_639_1(&trimmed.to_lowercase()).is_some(),
        3 => isolang::Language::from_639_3(&trimmed.to_lowercase()).is_some(),
        _ => isolang::Language::from_name(trimmed).is_some(),
    };
    if known {
        Ok(())
    } else {
        Err(anyhow!("Unknown language code: {}", trimmed))
    }
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Normal output
    #[default]
    Info,
    /// Verbose output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Translation settings
    #[serde(default)]
    pub translation: TranslationSettings,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Source-to-target word mappings applied after translation
    #[serde(default)]
    pub matching_words: Vec<MatchingWord>,

    /// Words and patterns removed before translation
    #[serde(default)]
    pub removal_words: Vec<String>,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            )
        })?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).map_err(|e| {
            anyhow!(
                "Failed to write config file {}: {}",
                path.as_ref().display(),
                e
            )
        })?;
        Ok(())
    }

    /// Load from file when it exists, otherwise write defaults there
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Config::default();
            config.save_to_file(path)?;
            Ok(config)
        }
    }
}
