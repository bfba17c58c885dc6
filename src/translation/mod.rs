/*!
 * Translation strategies for protected subtitle text.
 *
 * - `prompts`: shared prompt builders used by every provider client
 * - `retry`: the Batch -> Indexed -> Line-by-line escalation ladder
 */

pub use self::retry::{RetryOrchestrator, Tier, UnitOutcome};

pub mod prompts;
pub mod retry;
