/*!
 * Tests for provider payload parsing, the client factory, and the
 * mock client's contract
 */

use subtrans::app_config::Platform;
use subtrans::providers::{PromptStyle, TranslationClient, create_client, parse_lines_payload};
use subtrans::providers::mock::{MockBehavior, MockClient};

use crate::common;

#[test]
fn test_parse_lines_payload_withLinesObject_shouldExtractTexts() {
    let payload = r#"{"lines": ["Hello", "World"]}"#;
    let lines = parse_lines_payload(payload).unwrap();
    assert_eq!(lines, vec!["Hello", "World"]);
}

#[test]
fn test_parse_lines_payload_withBareArray_shouldExtractTexts() {
    let payload = r#"["One", "Two"]"#;
    let lines = parse_lines_payload(payload).unwrap();
    assert_eq!(lines, vec!["One", "Two"]);
}

#[test]
fn test_parse_lines_payload_withCodeFence_shouldStripFence() {
    let payload = "```json\n{\"lines\": [\"A\"]}\n```";
    let lines = parse_lines_payload(payload).unwrap();
    assert_eq!(lines, vec!["A"]);
}

#[test]
fn test_parse_lines_payload_withMissingLinesKey_shouldFail() {
    assert!(parse_lines_payload(r#"{"texts": []}"#).is_err());
}

#[test]
fn test_parse_lines_payload_withNonStringEntries_shouldFail() {
    assert!(parse_lines_payload(r#"{"lines": [1, 2]}"#).is_err());
}

#[test]
fn test_parse_lines_payload_withInvalidJson_shouldFail() {
    assert!(parse_lines_payload("not json at all").is_err());
}

#[test]
fn test_create_client_withEachPlatform_shouldPickMatchingClient() {
    for (platform, expected_name) in [
        (Platform::OpenAI, "OpenAI"),
        (Platform::Gemini, "Gemini"),
        (Platform::DeepSeek, "DeepSeek"),
        (Platform::Claude, "Claude"),
    ] {
        let mut settings = common::test_settings();
        settings.platform = platform;
        let client = create_client(&settings).unwrap();
        assert_eq!(client.name(), expected_name);
    }
}

#[tokio::test]
async fn test_mock_client_working_shouldPreserveLineCountsAndTokens() {
    let client = MockClient::working();
    let texts = vec!["§0§Hello§1§\nsecond line".to_string()];
    let out = client
        .translate_lines(&texts, "en", "el", PromptStyle::Plain)
        .await
        .unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].split('\n').count(), 2);
    assert!(out[0].contains("§0§"));
    assert!(out[0].contains("§1§"));
    assert!(out[0].contains("[el]"));
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_mock_client_failing_shouldReturnApiError() {
    let client = MockClient::failing();
    let texts = vec!["Hello".to_string()];
    let result = client
        .translate_lines(&texts, "en", "el", PromptStyle::Plain)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_mock_client_dropLast_shouldShortenResponse() {
    let client = MockClient::new(MockBehavior::DropLast);
    let texts = vec!["a".to_string(), "b".to_string()];
    let out = client
        .translate_lines(&texts, "en", "el", PromptStyle::Plain)
        .await
        .unwrap();
    assert_eq!(out.len(), 1);
}

#[tokio::test]
async fn test_mock_client_callRecording_shouldCaptureStyle() {
    let client = MockClient::working();
    let texts = vec!["x".to_string()];
    client
        .translate_lines(&texts, "en", "el", PromptStyle::Indexed)
        .await
        .unwrap();

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].style, PromptStyle::Indexed);
    assert_eq!(calls[0].texts, vec!["x"]);
}
