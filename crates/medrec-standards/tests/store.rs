use std::fs;

use medrec_standards::{HeaderPattern, PatternStore, StandardsError, default_patterns};

fn store_in(dir: &tempfile::TempDir) -> PatternStore {
    PatternStore::new(dir.path().join("config").join("header_patterns.json"))
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = store_in(&dir);
    assert!(store.try_load().is_err());
    assert_eq!(store.load(), default_patterns());
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = store_in(&dir);
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "{ not json").unwrap();
    let error = store.try_load().expect_err("corrupt file");
    assert!(matches!(error, StandardsError::Json { .. }));
    assert_eq!(store.load(), default_patterns());
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = store_in(&dir);
    let patterns = vec![
        HeaderPattern::new("(?i)RADIOLOGY", "Radiology Summary"),
        HeaderPattern::new("(?i)VITAL SIGNS", "Vital Signs"),
    ];
    store.save(&patterns).expect("save patterns");
    let contents = fs::read_to_string(store.path()).unwrap();
    assert!(contents.contains("\"header_patterns\""));
    assert_eq!(store.try_load().expect("load patterns"), patterns);
}

#[test]
fn add_appends_to_defaults_when_file_missing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = store_in(&dir);
    let patterns = store
        .add("(?i)RADIOLOGY SUMMARY", "Radiology Summary")
        .expect("add pattern");
    assert_eq!(patterns.len(), default_patterns().len() + 1);
    let stored = store.try_load().expect("stored file");
    assert_eq!(
        stored.last(),
        Some(&HeaderPattern::new("(?i)RADIOLOGY SUMMARY", "Radiology Summary"))
    );
}

#[test]
fn invalid_regex_leaves_store_untouched() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = store_in(&dir);
    let saved = vec![HeaderPattern::new("(?i)VITAL SIGNS", "Vital Signs")];
    store.save(&saved).unwrap();
    let before = fs::read_to_string(store.path()).unwrap();

    let error = store.add("(?i)RADIOLOGY[", "Radiology").expect_err("bad regex");
    assert!(matches!(error, StandardsError::InvalidRegex { .. }));

    let after = fs::read_to_string(store.path()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn delete_removes_by_index() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = store_in(&dir);
    store
        .save(&[
            HeaderPattern::new("A", "Alpha"),
            HeaderPattern::new("B", "Beta"),
        ])
        .unwrap();
    let removed = store.delete(0).expect("delete first");
    assert_eq!(removed.label, "Alpha");
    assert_eq!(store.try_load().unwrap(), vec![HeaderPattern::new("B", "Beta")]);

    let error = store.delete(5).expect_err("out of range");
    assert!(matches!(
        error,
        StandardsError::PatternIndex { index: 5, len: 1 }
    ));
}

#[test]
fn document_without_key_is_empty_list() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = store_in(&dir);
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "{}").unwrap();
    assert!(store.load().is_empty());
}
