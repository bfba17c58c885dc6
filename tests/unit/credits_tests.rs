/*!
 * Tests for translator credit detection, replacement, and insertion
 */

use subtrans::processing::CreditsManager;

use crate::common;

#[test]
fn test_is_credit_line_withKnownPatterns_shouldMatch() {
    assert!(CreditsManager::is_credit_line("Translated by Somebody"));
    assert!(CreditsManager::is_credit_line("subtitles by the team"));
    assert!(CreditsManager::is_credit_line("Subs by xyz"));
    assert!(CreditsManager::is_credit_line("Translator: xyz"));
    assert!(CreditsManager::is_credit_line("Μετάφραση από κάποιον"));
}

#[test]
fn test_is_credit_line_withOrdinaryDialogue_shouldNotMatch() {
    assert!(!CreditsManager::is_credit_line("He translated the letter."));
    assert!(!CreditsManager::is_credit_line("We went by the station."));
    assert!(!CreditsManager::is_credit_line(""));
    assert!(!CreditsManager::is_credit_line("   "));
}

#[test]
fn test_replace_existing_withCreditInHeadWindow_shouldRewriteLine() {
    let mut document = common::build_document(&[
        (0, 2000, "Translated by OldGroup"),
        (3000, 5000, "Hello"),
    ]);
    let manager = CreditsManager::new("Tester");

    assert!(manager.replace_existing(&mut document));
    assert_eq!(
        document.entries[0].lines,
        vec!["Translated by Tester with AI"]
    );
    assert_eq!(document.entries[1].lines, vec!["Hello"]);
}

#[test]
fn test_replace_existing_withCreditBeyondWindows_shouldNotTouchIt() {
    // 12 cues, credit in the middle, outside both 5-cue windows
    let mut cues: Vec<(u64, u64, String)> = (0..12)
        .map(|i| (i * 2000, i * 2000 + 1000, format!("line {}", i)))
        .collect();
    cues[6].2 = "Subtitles by Nobody".to_string();
    let as_refs: Vec<(u64, u64, &str)> =
        cues.iter().map(|(s, e, t)| (*s, *e, t.as_str())).collect();
    let mut document = common::build_document(&as_refs);

    let manager = CreditsManager::new("Tester");
    assert!(!manager.replace_existing(&mut document));
    assert_eq!(document.entries[6].lines, vec!["Subtitles by Nobody"]);
}

#[test]
fn test_apply_withReplacement_shouldNotAlsoInsert() {
    let mut document = common::build_document(&[
        (0, 2000, "Subs by OldGroup"),
        (20_000, 22_000, "Hello"),
    ]);
    let manager = CreditsManager::new("Tester");
    manager.apply(&mut document, true, true, false);

    // The 18s gap would qualify, but the replacement already happened
    assert_eq!(document.len(), 2);
    assert_eq!(
        document.entries[0].lines,
        vec!["Translated by Tester with AI"]
    );
}

#[test]
fn test_insert_credit_withQualifyingGap_shouldUseLargestGap() {
    let mut document = common::build_document(&[
        (0, 1000, "a"),
        (7_000, 8_000, "b"),   // 6s gap before this cue
        (20_000, 21_000, "c"), // 12s gap before this cue
    ]);
    let manager = CreditsManager::new("Tester");
    manager.apply(&mut document, false, true, false);

    assert_eq!(document.len(), 4);
    let credit = &document.entries[2];
    assert_eq!(credit.lines, vec!["Translated by Tester with AI"]);
    // 500ms after the previous cue, 3s long, inside the gap
    assert_eq!(credit.start_time_ms, 8_500);
    assert_eq!(credit.end_time_ms, 11_500);
    // Renumbered 1..N afterwards
    let nums: Vec<usize> = document.entries.iter().map(|e| e.seq_num).collect();
    assert_eq!(nums, vec![1, 2, 3, 4]);
}

#[test]
fn test_insert_credit_withMinimumGap_shouldStayInsideGap() {
    let mut document = common::build_document(&[
        (0, 1000, "a"),
        (6_500, 8_000, "b"), // 5.5s gap, barely qualifies
    ]);
    let manager = CreditsManager::new("Tester");
    manager.apply(&mut document, false, true, false);

    let credit = &document.entries[1];
    assert_eq!(credit.start_time_ms, 1_500);
    assert_eq!(credit.end_time_ms, 4_500);
    assert!(credit.end_time_ms <= document.entries[2].start_time_ms);
}

#[test]
fn test_insert_credit_withNoQualifyingGap_shouldAppendAtEnd() {
    let mut document = common::build_document(&[
        (0, 1000, "a"),
        (2_000, 3_000, "b"),
    ]);
    let manager = CreditsManager::new("Tester");
    manager.apply(&mut document, false, true, false);

    assert_eq!(document.len(), 3);
    let credit = document.entries.last().unwrap();
    assert_eq!(credit.lines, vec!["Translated by Tester with AI"]);
    assert_eq!(credit.start_time_ms, 4_000);
    assert_eq!(credit.end_time_ms, 7_000);
}

#[test]
fn test_insert_credit_withAppendForced_shouldIgnoreGaps() {
    let mut document = common::build_document(&[
        (0, 1000, "a"),
        (60_000, 61_000, "b"),
    ]);
    let manager = CreditsManager::new("Tester");
    manager.apply(&mut document, false, true, true);

    let credit = document.entries.last().unwrap();
    assert_eq!(credit.start_time_ms, 62_000);
    assert_eq!(credit.end_time_ms, 65_000);
}

#[test]
fn test_apply_withEverythingDisabled_shouldOnlyRenumber() {
    let mut document = common::build_document(&[
        (5_000, 6_000, "later"),
        (0, 1_000, "earlier"),
    ]);
    let manager = CreditsManager::new("Tester");
    manager.apply(&mut document, false, false, false);

    assert_eq!(document.len(), 2);
    assert_eq!(document.entries[0].lines, vec!["earlier"]);
    assert_eq!(document.entries[0].seq_num, 1);
}
