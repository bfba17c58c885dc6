/*!
 * Tests for SRT parsing, validation, and composition
 */

use std::fmt::Write;

use subtrans::errors::SubtitleError;
use subtrans::subtitle_processor::{SubtitleDocument, SubtitleEntry};

use crate::common;

/// Test timestamp parsing and formatting
#[test]
fn test_timestamp_parsing_withValidTimestamp_shouldParseAndFormat() {
    let ts = "01:23:45,678";
    let ms = SubtitleEntry::parse_timestamp(ts).unwrap();
    assert_eq!(ms, 5_025_678);

    let formatted = SubtitleEntry::format_timestamp(ms);
    assert_eq!(formatted, ts);
}

#[test]
fn test_timestamp_parsing_withOutOfRangeFields_shouldFail() {
    assert!(SubtitleEntry::parse_timestamp("00:61:00,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("00:00:61,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("00:00:00,1000").is_err());
    assert!(SubtitleEntry::parse_timestamp("garbage").is_err());
}

/// Test subtitle entry display formatting
#[test]
fn test_subtitle_entry_display_withValidEntry_shouldFormatCorrectly() {
    let entry = SubtitleEntry::new(1, 5000, 10000, vec!["Test subtitle".to_string()]);
    let mut output = String::new();
    write!(output, "{}", entry).unwrap();

    assert!(output.starts_with("1\n"));
    assert!(output.contains("00:00:05,000 --> 00:00:10,000"));
    assert!(output.contains("Test subtitle"));
    assert!(output.ends_with("\n\n"));
}

#[test]
fn test_entry_text_roundtrip_withMultilineCue_shouldPreserveLines() {
    let mut entry = SubtitleEntry::new(1, 0, 1000, vec!["Hello".to_string(), "World".to_string()]);
    assert_eq!(entry.text(), "Hello\nWorld");

    entry.set_text("One\nTwo\nThree");
    assert_eq!(entry.lines, vec!["One", "Two", "Three"]);
}

#[test]
fn test_entry_validation_withInvertedTimeRange_shouldFail() {
    let result = SubtitleEntry::new_validated(1, 5000, 5000, vec!["x".to_string()]);
    assert!(matches!(
        result,
        Err(SubtitleError::InvalidTimeRange { seq_num: 1, .. })
    ));
}

#[test]
fn test_parse_withValidFile_shouldProduceOrderedEntries() {
    let document = SubtitleDocument::parse(common::SAMPLE_SRT.as_bytes()).unwrap();
    assert_eq!(document.len(), 3);
    assert_eq!(document.entries[0].seq_num, 1);
    assert_eq!(document.entries[0].start_time_ms, 1000);
    assert_eq!(document.entries[0].lines, vec!["This is a test subtitle."]);
    assert_eq!(document.entries[2].end_time_ms, 14_000);
}

#[test]
fn test_parse_withBom_shouldStripIt() {
    let content = format!("\u{feff}{}", common::SAMPLE_SRT);
    let document = SubtitleDocument::parse(content.as_bytes()).unwrap();
    assert_eq!(document.len(), 3);
}

#[test]
fn test_parse_withCrlfLineEndings_shouldParse() {
    let content = common::SAMPLE_SRT.replace('\n', "\r\n");
    let document = SubtitleDocument::parse(content.as_bytes()).unwrap();
    assert_eq!(document.len(), 3);
    assert_eq!(document.entries[0].lines, vec!["This is a test subtitle."]);
}

#[test]
fn test_parse_withOutOfOrderCues_shouldSortAndRenumber() {
    let content = common::build_srt(&[
        (10_000, 12_000, "Second"),
        (1_000, 3_000, "First"),
    ]);
    let document = SubtitleDocument::parse_str(&content).unwrap();
    assert_eq!(document.entries[0].lines, vec!["First"]);
    assert_eq!(document.entries[0].seq_num, 1);
    assert_eq!(document.entries[1].lines, vec!["Second"]);
    assert_eq!(document.entries[1].seq_num, 2);
}

#[test]
fn test_parse_withEmptyInput_shouldReportEmptyDocument() {
    assert!(matches!(
        SubtitleDocument::parse_str(""),
        Err(SubtitleError::EmptyDocument)
    ));
    assert!(matches!(
        SubtitleDocument::parse_str("\n\n  \n"),
        Err(SubtitleError::EmptyDocument)
    ));
}

#[test]
fn test_parse_withBadIndexLine_shouldReportLine() {
    let content = "not-a-number\n00:00:01,000 --> 00:00:02,000\nHello\n";
    match SubtitleDocument::parse_str(content) {
        Err(SubtitleError::MalformedIndex { line, found }) => {
            assert_eq!(line, 1);
            assert_eq!(found, "not-a-number");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_parse_withZeroIndex_shouldFail() {
    let content = "0\n00:00:01,000 --> 00:00:02,000\nHello\n";
    assert!(matches!(
        SubtitleDocument::parse_str(content),
        Err(SubtitleError::MalformedIndex { .. })
    ));
}

#[test]
fn test_parse_withBadTimestampLine_shouldReportLine() {
    let content = "1\n00:00:01.000 --> 00:00:02,000\nHello\n";
    match SubtitleDocument::parse_str(content) {
        Err(SubtitleError::MalformedTimestamp { line, .. }) => assert_eq!(line, 2),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_parse_withMissingTextLines_shouldReportTruncatedBlock() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:03,000 --> 00:00:04,000\nHi\n";
    assert!(matches!(
        SubtitleDocument::parse_str(content),
        Err(SubtitleError::TruncatedBlock { line: 1 })
    ));
}

#[test]
fn test_parse_withInvalidUtf8_shouldReportEncoding() {
    let raw = [0x31, 0x0a, 0xff, 0xfe, 0x0a];
    assert!(matches!(
        SubtitleDocument::parse(&raw),
        Err(SubtitleError::InvalidEncoding(_))
    ));
}

#[test]
fn test_compose_withParsedDocument_shouldRoundTrip() {
    let document = SubtitleDocument::parse(common::SAMPLE_SRT.as_bytes()).unwrap();
    let composed = String::from_utf8(document.compose()).unwrap();
    assert_eq!(composed, common::SAMPLE_SRT);
}

#[test]
fn test_compose_withStaleIndices_shouldRenumber() {
    let mut document = common::build_document(&[(0, 1000, "a"), (2000, 3000, "b")]);
    document.entries[0].seq_num = 7;
    document.entries[1].seq_num = 3;

    let composed = String::from_utf8(document.compose()).unwrap();
    assert!(composed.starts_with("1\n"));
    assert!(composed.contains("\n2\n"));
}

#[test]
fn test_compose_withEmptyLine_shouldKeepIt() {
    let document = common::build_document(&[(0, 1000, "top\n\nbottom")]);
    let composed = String::from_utf8(document.compose()).unwrap();
    assert!(composed.contains("top\n\nbottom\n"));
}
