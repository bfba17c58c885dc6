/*!
 * # subtrans - AI subtitle translation pipeline
 *
 * A Rust library for translating SRT subtitle files with LLM providers.
 *
 * ## Features
 *
 * - Strict SRT parsing and composition with timing validation
 * - Pre-translation word removal and placeholder protection for markup,
 *   entities and glossary terms
 * - Multiple AI providers behind one trait:
 *   - OpenAI API
 *   - Google Gemini (OpenAI-compatible endpoint)
 *   - DeepSeek
 *   - Anthropic Claude
 * - Three-tier retry ladder: batch, indexed, line-by-line with
 *   original-text fallback
 * - Post-translation word replacement and translator credits handling
 * - Concurrent job scheduler with ordered progress events and
 *   cooperative cancellation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT parsing, validation and composition
 * - `processing`: Document transforms:
 *   - `processing::word_removal`: Pre-translation cleanup rules
 *   - `processing::placeholders`: Sentinel-token protection
 *   - `processing::replacements`: Post-translation word mapping
 *   - `processing::credits`: Translator credit replacement and insertion
 * - `providers`: Client implementations for the LLM providers
 * - `translation`: Prompt construction and the retry orchestrator
 * - `jobs`: Scheduler, registry and progress reporting
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod jobs;
pub mod processing;
pub mod providers;
pub mod subtitle_processor;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, Platform, TranslationSettings};
pub use errors::{AppError, ProviderError, SubtitleError, TranslationError};
pub use jobs::{JobRegistry, JobScheduler, ProgressEvent, TranslationRequest};
pub use subtitle_processor::{SubtitleDocument, SubtitleEntry};
