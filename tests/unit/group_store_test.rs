use std::sync::Arc;

use tabstash::database::Database;
use tabstash::managers::group_store::{GroupStore, GroupStoreTrait, TabRemoval};
use tabstash::types::errors::StoreError;
use tabstash::types::group::{Group, GroupMap};
use tabstash::types::tab::Tab;

fn store() -> GroupStore {
    let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
    GroupStore::new(db)
}

fn live_group(title: &str, urls: &[&str]) -> Group {
    Group::live(
        title,
        urls.iter().map(|u| Tab::new(u, Some("Tab"), None)).collect(),
    )
}

fn capture(title: &str, urls: &[&str]) -> GroupMap {
    let mut map = GroupMap::new();
    map.insert("42".to_string(), live_group(title, urls));
    map
}

fn is_timestamped_key(key: &str, prefix: &str) -> bool {
    key.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .map(|ts| !ts.is_empty() && ts.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

#[test]
fn test_get_all_empty_store() {
    assert!(store().get_all().unwrap().is_empty());
}

#[test]
fn test_merge_assigns_sanitized_timestamped_key() {
    let store = store();
    let outcome = store
        .merge(&capture("Work", &["https://a", "https://b"]))
        .unwrap();

    assert_eq!(outcome.inserted.len(), 1);
    assert!(outcome.skipped.is_empty());

    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 1);
    let (key, group) = all.iter().next().unwrap();
    assert!(
        is_timestamped_key(key, "work"),
        "key should match work_<millis>: {}",
        key
    );
    assert_eq!(group.title, "work");
    assert_eq!(group.tabs.len(), 2);
    assert!(group.saved_at.is_some());
}

#[test]
fn test_merge_is_additive_across_calls() {
    // Capture B repeats a group present in capture A (same live host id):
    // history must grow, never overwrite in place.
    let store = store();
    let snapshot = capture("Work", &["https://a"]);

    let first = store.merge(&snapshot).unwrap();
    let second = store.merge(&snapshot).unwrap();

    assert_ne!(first.inserted[0], second.inserted[0]);
    assert_eq!(store.get_all().unwrap().len(), 2);
}

#[test]
fn test_merge_keys_unique_within_one_call() {
    let store = store();
    let mut snapshot = GroupMap::new();
    // Two distinct live groups with the same title sanitize identically.
    snapshot.insert("1".to_string(), live_group("Work", &["https://a"]));
    snapshot.insert("2".to_string(), live_group("Work", &["https://b"]));

    let outcome = store.merge(&snapshot).unwrap();
    assert_eq!(outcome.inserted.len(), 2);
    assert_ne!(outcome.inserted[0], outcome.inserted[1]);
    assert_eq!(store.get_all().unwrap().len(), 2);
}

#[test]
fn test_merge_never_persists_synthetic_ungrouped_entries() {
    let store = store();
    let mut snapshot = capture("Work", &["https://a"]);
    let mut loose = live_group("Page A and 2 more", &["https://x", "https://y", "https://z"]);
    loose.ungrouped = true;
    snapshot.insert("ungrouped_1".to_string(), loose);

    let outcome = store.merge(&snapshot).unwrap();
    assert_eq!(outcome.inserted.len(), 1);
    assert!(outcome.inserted[0].starts_with("work_"));
    assert_eq!(store.get_all().unwrap().len(), 1);
}

#[test]
fn test_merge_skips_unsanitizable_title_without_failing() {
    let store = store();
    let mut snapshot = capture("Work", &["https://a"]);
    snapshot.insert("7".to_string(), live_group("!!!", &["https://b"]));

    let outcome = store.merge(&snapshot).unwrap();
    assert_eq!(outcome.inserted.len(), 1);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].title, "!!!");
    assert_eq!(store.get_all().unwrap().len(), 1);
}

#[test]
fn test_merge_skips_empty_tab_list() {
    let store = store();
    let mut snapshot = GroupMap::new();
    snapshot.insert("9".to_string(), live_group("Empty", &[]));

    let outcome = store.merge(&snapshot).unwrap();
    assert!(outcome.inserted.is_empty());
    assert_eq!(outcome.skipped.len(), 1);
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn test_delete_absent_returns_false() {
    let store = store();
    assert!(!store.delete("missing").unwrap());
}

#[test]
fn test_delete_present_removes_entry() {
    let store = store();
    let outcome = store.merge(&capture("Work", &["https://a"])).unwrap();
    let key = &outcome.inserted[0];

    assert!(store.delete(key).unwrap());
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn test_rename_absent_is_not_found() {
    let store = store();
    match store.rename("missing", "anything") {
        Err(StoreError::NotFound(key)) => assert_eq!(key, "missing"),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_rename_touches_only_title() {
    let store = store();
    let outcome = store
        .merge(&capture("Work", &["https://a", "https://b"]))
        .unwrap();
    let key = outcome.inserted[0].clone();
    let before = store.get_all().unwrap()[&key].clone();

    store.rename(&key, "Deep Work").unwrap();

    let after = store.get_all().unwrap()[&key].clone();
    assert_eq!(after.title, "Deep Work");
    assert_eq!(after.tabs, before.tabs);
    assert_eq!(after.saved_at, before.saved_at);
}

#[test]
fn test_remove_tab_decrements_by_one() {
    let store = store();
    let outcome = store
        .merge(&capture("Work", &["https://a", "https://b"]))
        .unwrap();
    let key = &outcome.inserted[0];

    let removal = store.remove_tab(key, 0).unwrap();
    assert_eq!(removal, TabRemoval::Removed { remaining: 1 });

    let group = store.get_all().unwrap()[key].clone();
    assert_eq!(group.tabs.len(), 1);
    assert_eq!(group.tabs[0].url, "https://b");
}

#[test]
fn test_removing_last_tab_deletes_the_group() {
    let store = store();
    let outcome = store.merge(&capture("Work", &["https://a"])).unwrap();
    let key = &outcome.inserted[0];

    let removal = store.remove_tab(key, 0).unwrap();
    assert_eq!(removal, TabRemoval::GroupDeleted);
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn test_remove_tab_invalid_index() {
    let store = store();
    let outcome = store.merge(&capture("Work", &["https://a"])).unwrap();
    let key = &outcome.inserted[0];

    match store.remove_tab(key, 5) {
        Err(StoreError::TabIndexOutOfRange { index, .. }) => assert_eq!(index, 5),
        other => panic!("expected TabIndexOutOfRange, got {:?}", other),
    }
}

#[test]
fn test_remove_tab_absent_key() {
    let store = store();
    assert!(matches!(
        store.remove_tab("missing", 0),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_list_saved_sorts_newest_first() {
    let store = store();
    store.merge(&capture("Older", &["https://a"])).unwrap();
    store.merge(&capture("Newer", &["https://b"])).unwrap();

    let listed = store.list_saved().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].1.title, "newer");
    assert_eq!(listed[1].1.title, "older");
    assert!(listed[0].1.saved_at >= listed[1].1.saved_at);
}

#[test]
fn test_import_preserves_keys_and_counts() {
    let store = store();
    let mut incoming = GroupMap::new();
    incoming.insert(
        "g1".to_string(),
        Group::saved("X", vec![Tab::new("https://a", None, None)], 1_700_000_000_000),
    );
    incoming.insert(
        "empty".to_string(),
        Group::saved("Y", vec![], 1_700_000_000_000),
    );

    let outcome = store.import(incoming).unwrap();
    assert_eq!(outcome.imported, 1);

    let all = store.get_all().unwrap();
    assert!(all.contains_key("g1"));
    assert!(!all.contains_key("empty"));
}
