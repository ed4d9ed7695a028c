//! Store Persistence Tests
//!
//! Tests for record persistence:
//! - File store survives reopen
//! - Corrupted lines are detected on read
//! - Principals are isolated
//! - Applied records are keyed by (query id, recommendation id)

use std::fs;
use std::sync::Arc;
use std::thread;

use dboptima::advisor::SeededRandom;
use dboptima::ingest::parse_log;
use dboptima::orchestrator::{
    apply_recommendation, AppliedIndex, AppliedSet, QueryAnalyzer, RawQuery,
};
use dboptima::store::{FileStore, MemoryStore, RecordStore, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn applied_store(dir: &TempDir) -> FileStore<AppliedIndex> {
    FileStore::open(dir.path().join("applied_indexes.jsonl")).unwrap()
}

// =============================================================================
// File Store Tests
// =============================================================================

/// Records written before reopen are read back after.
#[test]
fn test_queries_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("queries.jsonl");
    let queries = parse_log("SELECT * FROM a\nSELECT * FROM b\n", "slow.txt");

    {
        let store: FileStore<RawQuery> = FileStore::open(&path).unwrap();
        for q in &queries {
            store.insert("guest", q).unwrap();
        }
    }

    let reopened: FileStore<RawQuery> = FileStore::open(&path).unwrap();
    assert_eq!(reopened.list("guest").unwrap(), queries);
}

/// A flipped byte in any line fails the read.
#[test]
fn test_corruption_detected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("queries.jsonl");
    let store: FileStore<RawQuery> = FileStore::open(&path).unwrap();
    for q in parse_log("SELECT 1\nSELECT 2\nSELECT 3", "x.txt") {
        store.insert("guest", &q).unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    let damaged = format!(
        "{}\n{}\n{}\n",
        lines[0],
        lines[1].replace("SELECT 2", "SELECT 9"),
        lines[2]
    );
    fs::write(&path, damaged).unwrap();

    let err = store.list("guest").unwrap_err();
    assert!(matches!(err, StoreError::ChecksumMismatch(2)));
    assert!(err.is_corruption());
}

/// A line with a valid checksum but an unexpected record shape is reported.
#[test]
fn test_foreign_record_shape_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.jsonl");

    let numbers: FileStore<u32> = FileStore::open(&path).unwrap();
    numbers.insert("guest", &7).unwrap();

    let applied: FileStore<AppliedIndex> = FileStore::open(&path).unwrap();
    let err = applied.list("guest").unwrap_err();
    assert!(matches!(err, StoreError::CorruptRecord { line: 1, .. }));
}

/// Clearing one principal leaves the other intact on disk.
#[test]
fn test_principal_isolation() {
    let dir = TempDir::new().unwrap();
    let store = applied_store(&dir);

    let batch = QueryAnalyzer::with_random(SeededRandom::new(1))
        .analyze_batch(&parse_log("SELECT * FROM t WHERE a > 1", "x.txt"));
    let key = batch.keys()[0].clone();

    apply_recommendation(&batch, &key, 1, &store, "alice").unwrap();
    apply_recommendation(&batch, &key, 1, &store, "bob").unwrap();

    assert_eq!(store.clear("alice").unwrap(), 1);
    assert!(store.list("alice").unwrap().is_empty());
    assert_eq!(store.list("bob").unwrap().len(), 1);

    let reopened = applied_store(&dir);
    assert_eq!(reopened.list("bob").unwrap().len(), 1);
}

/// Blank principals are rejected before touching the file.
#[test]
fn test_blank_principal_rejected() {
    let dir = TempDir::new().unwrap();
    let store = applied_store(&dir);
    assert!(matches!(
        store.list(""),
        Err(StoreError::InvalidPrincipal(_))
    ));
    assert!(!store.path().exists());
}

/// Concurrent inserts through a shared store all land.
#[test]
fn test_shared_store_concurrent_inserts() {
    let dir = TempDir::new().unwrap();
    let store: Arc<FileStore<u32>> =
        Arc::new(FileStore::open(dir.path().join("n.jsonl")).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25 {
                    store.insert("guest", &(t * 100 + i)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.list("guest").unwrap().len(), 100);
}

// =============================================================================
// Apply Flow Tests
// =============================================================================

/// Applied records rebuild the applied set.
#[test]
fn test_applied_set_from_stored_records() {
    let store = MemoryStore::new();
    let batch = QueryAnalyzer::with_random(SeededRandom::new(2)).analyze_batch(&parse_log(
        "SELECT * FROM orders WHERE status = 'x' AND total > 3\nSELECT * FROM t",
        "x.txt",
    ));
    let first = batch.keys()[0].clone();
    let second = batch.keys()[1].clone();

    apply_recommendation(&batch, &first, 2, &store, "guest").unwrap();
    apply_recommendation(&batch, &second, 1, &store, "guest").unwrap();

    let set = AppliedSet::from_records(&store.list("guest").unwrap());
    assert!(set.contains(&first, 2));
    assert!(!set.contains(&first, 1));
    assert!(set.contains(&second, 1));
    assert!(!set.contains(&second, 2));
}

/// Applied record fields mirror the recommendation.
#[test]
fn test_applied_record_fields() {
    let store = MemoryStore::new();
    let batch = QueryAnalyzer::with_random(SeededRandom::new(3))
        .analyze_batch(&parse_log("SELECT * FROM users ORDER BY name, age", "x.txt"));
    let key = batch.keys()[0].clone();
    let rec = batch.get(&key).unwrap().recommendation(1).unwrap().clone();

    let applied = apply_recommendation(&batch, &key, 1, &store, "guest").unwrap();
    assert_eq!(applied.query_id, key);
    assert_eq!(applied.index_name, "idx_users_name_age");
    assert_eq!(applied.table_name, "users");
    assert_eq!(applied.columns, vec!["name", "age"]);
    assert_eq!(applied.index_type, "B-tree");
    assert_eq!(applied.improvement, rec.improvement);
    assert!(chrono::DateTime::parse_from_rfc3339(&applied.timestamp).is_ok());
}
