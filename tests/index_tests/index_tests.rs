//! Tests for KeyIndex
//!
//! These tests verify:
//! - Loading empty, fresh and malformed index files
//! - Add / remove with duplicate and missing keys
//! - Whole-file persistence in insertion order

use std::fs;
use std::path::PathBuf;

use linekv::index::KeyIndex;
use linekv::{InternalKey, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_index() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("keys.json");
    (temp_dir, path)
}

fn key(raw: &str) -> InternalKey {
    InternalKey::from_raw(raw).unwrap()
}

fn read_file_keys(path: &PathBuf) -> Vec<String> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_create_writes_empty_array() {
    let (_temp, path) = setup_temp_index();

    let index = KeyIndex::create(&path).unwrap();

    assert!(index.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}

#[test]
fn test_load_zero_length_file() {
    let (_temp, path) = setup_temp_index();
    fs::write(&path, "").unwrap();

    let index = KeyIndex::load(&path).unwrap();

    assert_eq!(index.len(), 0);
}

#[test]
fn test_load_existing_keys_in_order() {
    let (_temp, path) = setup_temp_index();
    fs::write(&path, r#"["b~|~|","a~|~|","c~|~|"]"#).unwrap();

    let index = KeyIndex::load(&path).unwrap();

    let raws: Vec<&str> = index.keys().iter().map(|k| k.raw()).collect();
    assert_eq!(raws, vec!["b", "a", "c"]);
}

#[test]
fn test_load_malformed_json() {
    let (_temp, path) = setup_temp_index();
    fs::write(&path, "[\"a~|~|\",").unwrap();

    let result = KeyIndex::load(&path);

    assert!(matches!(result, Err(StoreError::Parse { line: None, .. })));
}

#[test]
fn test_load_rejects_unsuffixed_key() {
    let (_temp, path) = setup_temp_index();
    fs::write(&path, r#"["plain"]"#).unwrap();

    assert!(matches!(
        KeyIndex::load(&path),
        Err(StoreError::Parse { .. })
    ));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let (_temp, path) = setup_temp_index();

    assert!(matches!(KeyIndex::load(&path), Err(StoreError::Io(_))));
}

// =============================================================================
// Mutation Tests
// =============================================================================

#[test]
fn test_add_persists_whole_list() {
    let (_temp, path) = setup_temp_index();
    let mut index = KeyIndex::create(&path).unwrap();

    index.add(key("key1")).unwrap();
    index.add(key("key2")).unwrap();

    assert!(index.contains(&key("key1")));
    assert!(index.contains(&key("key2")));
    assert_eq!(read_file_keys(&path), vec!["key1~|~|", "key2~|~|"]);
}

#[test]
fn test_add_duplicate_fails() {
    let (_temp, path) = setup_temp_index();
    let mut index = KeyIndex::create(&path).unwrap();
    index.add(key("k")).unwrap();

    let result = index.add(key("k"));

    assert!(matches!(result, Err(StoreError::DuplicateKey(k)) if k == "k"));
    assert_eq!(index.len(), 1);
    assert_eq!(read_file_keys(&path), vec!["k~|~|"]);
}

#[test]
fn test_remove_rewrites_file() {
    let (_temp, path) = setup_temp_index();
    let mut index = KeyIndex::create(&path).unwrap();
    index.add(key("a")).unwrap();
    index.add(key("b")).unwrap();
    index.add(key("c")).unwrap();

    index.remove(&key("b")).unwrap();

    assert!(!index.contains(&key("b")));
    assert_eq!(read_file_keys(&path), vec!["a~|~|", "c~|~|"]);
}

#[test]
fn test_remove_missing_fails() {
    let (_temp, path) = setup_temp_index();
    let mut index = KeyIndex::create(&path).unwrap();

    let result = index.remove(&key("ghost"));

    assert!(matches!(result, Err(StoreError::KeyNotFound(k)) if k == "ghost"));
}

#[test]
fn test_replace_and_reload() {
    let (_temp, path) = setup_temp_index();
    let mut index = KeyIndex::create(&path).unwrap();
    index.add(key("old")).unwrap();

    index.replace(vec![key("x"), key("y")]).unwrap();

    let reloaded = KeyIndex::load(&path).unwrap();
    assert_eq!(reloaded.keys(), &[key("x"), key("y")]);
}

#[test]
fn test_no_temp_file_left_behind() {
    let (temp, path) = setup_temp_index();
    let mut index = KeyIndex::create(&path).unwrap();
    index.add(key("a")).unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["keys.json"]);
}
