/*!
 * Prompt construction for translation requests.
 *
 * All providers share the same instructions so tier behavior does not
 * depend on the platform: the model must return a JSON object with a
 * `lines` array of exactly as many strings as it was given, and must
 * leave `§N§` sentinel tokens untouched.
 */

use serde_json::json;

/// System prompt for the plain batch tier
pub fn batch_system_prompt(source_language: &str, target_language: &str) -> String {
    format!(
        "You are a professional subtitle translator. Translate from {} to {}. \
         CRITICAL: Return exactly the same number of texts as provided, in the same order. \
         Do not add, remove, merge, or split texts or the lines inside them. \
         Keep every line break exactly where it is. \
         Sentinel tokens of the form §N§ must be copied through completely unchanged. \
         If a text is empty or whitespace, return it empty. \
         Respond with a JSON object {{\"lines\": [...]}} and nothing else.",
        source_language, target_language
    )
}

/// System prompt for the indexed tier, where each text carries an `[N] ` prefix
pub fn indexed_system_prompt(source_language: &str, target_language: &str) -> String {
    format!(
        "You are a professional subtitle translator. Translate from {} to {}. \
         Each text is prefixed with [N]. Keep the [N] prefix and translate only the \
         content after it. \
         CRITICAL: Return exactly the same number of texts as provided, in the same order. \
         Keep every line break exactly where it is. \
         Sentinel tokens of the form §N§ must be copied through completely unchanged. \
         Respond with a JSON object {{\"lines\": [...]}} and nothing else.",
        source_language, target_language
    )
}

/// User prompt carrying the texts to translate as a JSON array
pub fn user_prompt(texts: &[String], source_language: &str, target_language: &str) -> String {
    let payload = json!(texts);
    format!(
        "Translate these texts from {} to {}:\n\n{}\n\n\
         Return a JSON object with a \"lines\" array containing exactly {} strings.",
        source_language,
        target_language,
        payload,
        texts.len()
    )
}
