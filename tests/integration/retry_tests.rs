/*!
 * Retry ladder behavior against scripted providers
 */

use std::sync::Arc;

use subtrans::processing::PlaceholderProtector;
use subtrans::providers::PromptStyle;
use subtrans::providers::mock::{MockBehavior, MockClient};
use subtrans::subtitle_processor::SubtitleEntry;
use subtrans::translation::{RetryOrchestrator, Tier};

fn protector() -> Arc<PlaceholderProtector> {
    Arc::new(PlaceholderProtector::new(Vec::<String>::new(), false))
}

fn orchestrator(client: MockClient) -> RetryOrchestrator {
    RetryOrchestrator::new(Arc::new(client), protector(), "en", "el")
}

fn cue(text: &str) -> subtrans::processing::ProtectedCue {
    let entry = SubtitleEntry::new(
        1,
        0,
        1000,
        text.split('\n').map(|l| l.to_string()).collect(),
    );
    protector().protect_cue(&entry)
}

#[tokio::test]
async fn test_translate_unit_withWorkingClient_shouldStayAtBatchTier() {
    let client = MockClient::working();
    let orchestrator = orchestrator(client.clone());
    let cues = vec![cue("Hello"), cue("World")];

    let outcome = orchestrator.translate_unit(&cues).await;

    assert_eq!(outcome.tier, Tier::Batch);
    assert_eq!(outcome.soft_errors, 0);
    assert_eq!(outcome.texts, vec!["Hello [el]", "World [el]"]);
    // One plain call, nothing escalated
    assert_eq!(client.call_count(), 1);
    assert_eq!(client.calls()[0].style, PromptStyle::Plain);
}

#[tokio::test]
async fn test_translate_unit_withEmptyUnit_shouldShortCircuit() {
    let client = MockClient::working();
    let orchestrator = orchestrator(client.clone());

    let outcome = orchestrator.translate_unit(&[]).await;
    assert!(outcome.texts.is_empty());
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_translate_unit_withWhitespaceOnlyCues_shouldSkipProvider() {
    let client = MockClient::working();
    let orchestrator = orchestrator(client.clone());
    let cues = vec![cue(" "), cue("")];

    let outcome = orchestrator.translate_unit(&cues).await;
    assert_eq!(outcome.texts.len(), 2);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_translate_unit_withPlainMismatch_shouldSucceedAtIndexedTier() {
    let client = MockClient::new(MockBehavior::PlainMismatchIndexedOk);
    let orchestrator = orchestrator(client.clone());
    let cues = vec![cue("One"), cue("Two")];

    let outcome = orchestrator.translate_unit(&cues).await;

    assert_eq!(outcome.tier, Tier::Indexed);
    assert_eq!(outcome.soft_errors, 0);
    // Index prefixes are stripped from the output
    assert_eq!(outcome.texts, vec!["One [el]", "Two [el]"]);

    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].style, PromptStyle::Plain);
    assert_eq!(calls[1].style, PromptStyle::Indexed);
    assert_eq!(calls[1].texts, vec!["[1] One", "[2] Two"]);
}

#[tokio::test]
async fn test_translate_unit_withMarkerFailure_shouldIsolateSingleCue() {
    let client = MockClient::new(MockBehavior::MismatchBatchesFailMarker {
        marker: "BAD".to_string(),
    });
    let orchestrator = orchestrator(client.clone());
    let cues = vec![cue("fine one"), cue("this is BAD"), cue("fine two")];

    let outcome = orchestrator.translate_unit(&cues).await;

    assert_eq!(outcome.tier, Tier::LineByLine);
    assert_eq!(outcome.soft_errors, 1);
    assert_eq!(outcome.texts[0], "fine one [el]");
    // The failing cue keeps its original text
    assert_eq!(outcome.texts[1], "this is BAD");
    assert_eq!(outcome.texts[2], "fine two [el]");
}

#[tokio::test]
async fn test_translate_unit_withPersistentShapeMismatch_shouldKeepAllOriginals() {
    let client = MockClient::new(MockBehavior::DropLast);
    let orchestrator = orchestrator(client.clone());
    let cues = vec![cue("alpha"), cue("beta")];

    let outcome = orchestrator.translate_unit(&cues).await;

    // DropLast shortens every response, including single-cue calls
    assert_eq!(outcome.tier, Tier::LineByLine);
    assert_eq!(outcome.soft_errors, 2);
    assert_eq!(outcome.texts, vec!["alpha", "beta"]);
}

#[tokio::test]
async fn test_translate_unit_withCorruptedTokens_shouldRefuseOutput() {
    let client = MockClient::new(MockBehavior::CorruptTokens);
    let orchestrator = orchestrator(client.clone());
    let cues = vec![cue("<i>styled</i> text")];

    let outcome = orchestrator.translate_unit(&cues).await;

    // Token verification fails at every tier, the protected text survives
    assert_eq!(outcome.tier, Tier::LineByLine);
    assert_eq!(outcome.soft_errors, 1);
    assert_eq!(outcome.texts[0], cues[0].text);
}

#[tokio::test]
async fn test_translate_unit_withProviderDown_shouldNeverFailTheUnit() {
    let client = MockClient::failing();
    let orchestrator = orchestrator(client.clone());
    let cues = vec![cue("stubborn")];

    let outcome = orchestrator.translate_unit(&cues).await;

    assert_eq!(outcome.soft_errors, 1);
    assert_eq!(outcome.texts, vec!["stubborn"]);
}

#[tokio::test]
async fn test_translate_unit_withMultilineCue_shouldEnforceLineCounts() {
    let client = MockClient::working();
    let orchestrator = orchestrator(client.clone());
    let cues = vec![cue("top line\nbottom line")];

    let outcome = orchestrator.translate_unit(&cues).await;

    assert_eq!(outcome.tier, Tier::Batch);
    assert_eq!(outcome.texts[0].split('\n').count(), 2);
}
