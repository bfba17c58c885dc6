/*!
 * Tests for file and folder utilities
 */

use std::path::Path;

use subtrans::file_utils::FileManager;

use crate::common;

#[test]
fn test_file_exists_withRealAndMissingPaths_shouldReportCorrectly() {
    let dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(dir.path(), "a.srt", common::SAMPLE_SRT).unwrap();

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(dir.path().join("missing.srt")));
    assert!(FileManager::dir_exists(dir.path()));
    assert!(!FileManager::dir_exists(&file));
}

#[test]
fn test_generate_output_path_shouldInsertLanguageCode() {
    let path = FileManager::generate_output_path(
        Path::new("/films/movie.srt"),
        Path::new("/out"),
        "el",
    );
    assert_eq!(path, Path::new("/out/movie.el.srt"));
}

#[test]
fn test_find_srt_files_withMixedTree_shouldFindOnlySrt() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "one.srt", common::SAMPLE_SRT).unwrap();
    common::create_test_file(dir.path(), "notes.txt", "nope").unwrap();
    let nested = dir.path().join("nested");
    FileManager::ensure_dir(&nested).unwrap();
    common::create_test_file(&nested, "two.SRT", common::SAMPLE_SRT).unwrap();

    let found = FileManager::find_srt_files(dir.path()).unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| {
        p.extension()
            .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case("srt"))
    }));
}

#[test]
fn test_read_source_file_shouldUseFileNameAsName() {
    let dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(dir.path(), "movie.srt", common::SAMPLE_SRT).unwrap();

    let source = FileManager::read_source_file(&file).unwrap();
    assert_eq!(source.name, "movie.srt");
    assert_eq!(source.data, common::SAMPLE_SRT.as_bytes());
}

#[test]
fn test_write_output_withMissingParent_shouldCreateIt() {
    let dir = common::create_temp_dir().unwrap();
    let target = dir.path().join("deep/nested/out.srt");

    FileManager::write_output(&target, b"payload").unwrap();
    assert_eq!(std::fs::read(&target).unwrap(), b"payload");
}
