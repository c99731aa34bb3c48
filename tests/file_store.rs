use std::sync::Arc;
use std::thread;

use msgbrowse::storage::{FileStore, KeyValueStore, StorageError};
use tempfile::TempDir;

#[test]
fn missing_directory_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("not-yet"));

    assert_eq!(store.get("authToken").unwrap(), None);
    assert!(!dir.path().join("not-yet").exists());
}

#[test]
fn set_creates_directory_and_file() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("nested").join("msgbrowse");
    let store = FileStore::new(&root);

    store.set("authToken", "xoxp-1").unwrap();

    assert!(store.path().exists());
    assert_eq!(store.get("authToken").unwrap().as_deref(), Some("xoxp-1"));

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["authToken"], "xoxp-1");
}

#[test]
fn keys_are_independent() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.remove("a").unwrap();

    assert_eq!(store.get("a").unwrap(), None);
    assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
}

#[test]
fn remove_missing_key_is_ok() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    store.remove("nothing").unwrap();
}

#[test]
fn corrupt_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    std::fs::write(store.path(), "[1, 2").unwrap();

    assert!(matches!(store.get("a"), Err(StorageError::Corrupt { .. })));
    assert!(matches!(store.set("a", "1"), Err(StorageError::Corrupt { .. })));
}

#[test]
fn concurrent_writers_do_not_lose_updates() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileStore::new(dir.path()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store.set(&format!("key{}", i), &i.to_string()).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..8 {
        assert_eq!(
            store.get(&format!("key{}", i)).unwrap(),
            Some(i.to_string())
        );
    }
}
