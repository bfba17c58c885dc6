/*!
 * Cue text processing stages that run around the provider call.
 *
 * - `word_removal`: strips configured words before translation
 * - `placeholders`: protects non-translatable spans with sentinel tokens
 * - `replacements`: applies matching-word substitutions after restore
 * - `credits`: detects, rewrites, and inserts translator credits
 */

pub mod credits;
pub mod placeholders;
pub mod replacements;
pub mod word_removal;

pub use credits::CreditsManager;
pub use placeholders::{PlaceholderProtector, ProtectedCue, ProtectedSpan, SpanKind};
pub use replacements::{MatchingWord, WordReplacer};
pub use word_removal::{RemovalKind, WordRemover};
