//! Tests for Engine
//!
//! These tests verify:
//! - insert/delete/find semantics and the documented scenarios
//! - No writes for duplicate inserts and absent deletes
//! - Persistence across close/open
//! - Grow/shrink/regrow across many keys
//! - Compaction and statistics

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};

use setkv::config::Config;
use setkv::engine::Engine;
use setkv::protocol::{Command, Response};
use setkv::SetKvError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::open_path(temp_dir.path()).unwrap();
    (temp_dir, engine)
}

fn reopen(temp_dir: &TempDir, engine: Engine) -> Engine {
    engine.close().unwrap();
    Engine::open_path(temp_dir.path()).unwrap()
}

fn values(engine: &Engine, key: &str) -> Option<Vec<i32>> {
    engine.find(key).map(|set| set.into_vec())
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_engine_open_creates_files() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("mydb");

    let engine = Engine::open(Config::builder().data_dir(&data_dir).build()).unwrap();

    assert!(data_dir.join("values.dat").exists());
    engine.close().unwrap();
    assert!(data_dir.join("index.idx").exists());
}

#[test]
fn test_engine_open_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .data_file("same")
        .index_file("same")
        .build();

    let result = Engine::open(config);

    assert!(matches!(result, Err(SetKvError::Config(_))));
}

#[test]
fn test_insert_duplicate_is_idempotent() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.insert("a", 5).unwrap();
    engine.insert("a", 3).unwrap();
    engine.insert("a", 5).unwrap();

    assert_eq!(values(&engine, "a"), Some(vec![3, 5]));
}

#[test]
fn test_delete_last_value_makes_key_absent() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.insert("a", 3).unwrap();
    engine.delete("a", 3).unwrap();

    assert_eq!(values(&engine, "a"), None);
    assert_eq!(engine.key_count(), 0);
}

#[test]
fn test_delete_on_untouched_key() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.delete("x", 1).unwrap();

    assert_eq!(values(&engine, "x"), None);
}

#[test]
fn test_mixed_insert_delete_scenario() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.insert("a", 1).unwrap();
    engine.insert("a", 2).unwrap();
    engine.insert("a", 3).unwrap();
    engine.delete("a", 2).unwrap();
    engine.insert("a", 4).unwrap();

    assert_eq!(values(&engine, "a"), Some(vec![1, 3, 4]));
}

#[test]
fn test_duplicate_insert_does_not_write() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.insert("a", 1).unwrap();
    let len = engine.records().len().unwrap();
    let location = engine.index().lookup("a");

    engine.insert("a", 1).unwrap();

    assert_eq!(engine.records().len().unwrap(), len);
    assert_eq!(engine.index().lookup("a"), location);
}

#[test]
fn test_delete_absent_value_leaves_other_keys_alone() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.insert("a", 1).unwrap();
    engine.insert("b", 2).unwrap();
    let len = engine.records().len().unwrap();

    engine.delete("a", 99).unwrap();
    engine.delete("zzz", 1).unwrap();

    assert_eq!(engine.records().len().unwrap(), len);
    assert_eq!(values(&engine, "a"), Some(vec![1]));
    assert_eq!(values(&engine, "b"), Some(vec![2]));
}

#[test]
fn test_shrink_keeps_offset() {
    let (_temp, mut engine) = setup_temp_engine();

    for v in 0..4 {
        engine.insert("a", v).unwrap();
    }
    let before = engine.index().lookup("a").unwrap();

    engine.delete("a", 2).unwrap();
    let after = engine.index().lookup("a").unwrap();

    assert_eq!(after.offset, before.offset);
    assert_eq!(after.count, 3);
    assert_eq!(after.reserved, before.reserved);
}

#[test]
fn test_execute_routes_commands() {
    let (_temp, mut engine) = setup_temp_engine();

    let r = engine
        .execute(Command::Insert { key: "k".into(), value: 9 })
        .unwrap();
    assert_eq!(r, Response::Done);

    let r = engine.execute(Command::Find { key: "k".into() }).unwrap();
    assert_eq!(r, Response::Values(vec![9]));

    engine
        .execute(Command::Delete { key: "k".into(), value: 9 })
        .unwrap();
    let r = engine.execute(Command::Find { key: "k".into() }).unwrap();
    assert_eq!(r, Response::Null);
}

// =============================================================================
// Placement Tests
// =============================================================================

#[test]
fn test_grow_shrink_regrow_between_neighbours() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.insert("a", 1).unwrap();
    engine.insert("b", 100).unwrap();
    engine.insert("b", 101).unwrap();

    // Force a relocation of "a" past its original reservation
    for v in 2..=10 {
        engine.insert("a", v).unwrap();
    }
    // Shrink back down, then regrow to the same count
    for v in 2..=10 {
        engine.delete("a", v).unwrap();
    }
    for v in (2..=10).rev() {
        engine.insert("a", v).unwrap();
    }
    engine.insert("c", 7).unwrap();

    assert_eq!(values(&engine, "a"), Some((1..=10).collect()));
    assert_eq!(values(&engine, "b"), Some(vec![100, 101]));
    assert_eq!(values(&engine, "c"), Some(vec![7]));
}

#[test]
fn test_matches_model_under_random_workload() {
    let (temp, mut engine) = setup_temp_engine();
    let mut model: BTreeMap<String, BTreeSet<i32>> = BTreeMap::new();

    let mut x: u64 = 42;
    for _ in 0..3000 {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let key = format!("k{}", (x >> 33) % 8);
        let value = ((x >> 20) % 32) as i32 - 16;

        if (x >> 60) % 3 == 0 {
            engine.delete(&key, value).unwrap();
            if let Some(set) = model.get_mut(&key) {
                set.remove(&value);
                if set.is_empty() {
                    model.remove(&key);
                }
            }
        } else {
            engine.insert(&key, value).unwrap();
            model.entry(key).or_default().insert(value);
        }
    }

    let check = |engine: &Engine| {
        for i in 0..8 {
            let key = format!("k{}", i);
            let expected = model.get(&key).map(|s| s.iter().copied().collect::<Vec<_>>());
            assert_eq!(values(engine, &key), expected, "key {}", key);
        }
    };

    check(&engine);
    let engine = reopen(&temp, engine);
    check(&engine);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_close_and_reopen_preserves_sets() {
    let (temp, mut engine) = setup_temp_engine();

    engine.insert("a", 5).unwrap();
    engine.insert("a", 3).unwrap();
    engine.insert("b", -1).unwrap();
    engine.insert("gone", 1).unwrap();
    engine.delete("gone", 1).unwrap();

    let engine = reopen(&temp, engine);

    assert_eq!(values(&engine, "a"), Some(vec![3, 5]));
    assert_eq!(values(&engine, "b"), Some(vec![-1]));
    assert_eq!(values(&engine, "gone"), None);
    assert_eq!(engine.key_count(), 2);
}

#[test]
fn test_reopen_without_close_loses_index() {
    let (temp, mut engine) = setup_temp_engine();

    engine.insert("a", 1).unwrap();
    drop(engine);

    let engine = Engine::open_path(temp.path()).unwrap();

    assert_eq!(values(&engine, "a"), None);
}

#[test]
fn test_corrupt_index_degrades_to_empty_store() {
    let (temp, mut engine) = setup_temp_engine();
    engine.insert("a", 1).unwrap();
    engine.close().unwrap();

    fs::write(temp.path().join("index.idx"), b"garbage").unwrap();
    let mut engine = Engine::open_path(temp.path()).unwrap();

    assert_eq!(values(&engine, "a"), None);

    // Store is still writable after degrading
    engine.insert("a", 2).unwrap();
    assert_eq!(values(&engine, "a"), Some(vec![2]));
}

#[test]
fn test_missing_medium_reads_as_absent() {
    let (temp, mut engine) = setup_temp_engine();
    engine.insert("a", 1).unwrap();

    fs::remove_file(temp.path().join("values.dat")).unwrap();

    assert_eq!(values(&engine, "a"), None);

    // Next insert starts a fresh record instead of writing past the end
    engine.insert("a", 2).unwrap();
    assert_eq!(values(&engine, "a"), Some(vec![2]));
}

#[test]
fn test_recreated_medium_does_not_mix_keys() {
    let (temp, mut engine) = setup_temp_engine();

    engine.insert("a", 1).unwrap();
    engine.insert("b", 2).unwrap();

    fs::remove_file(temp.path().join("values.dat")).unwrap();

    // b's new record lands at offset 0, where a's old record used to start
    engine.insert("b", 5).unwrap();
    engine.insert("a", 7).unwrap();

    assert_eq!(values(&engine, "a"), Some(vec![7]));
    assert_eq!(values(&engine, "b"), Some(vec![5]));
    assert_eq!(engine.key_count(), 2);
}

#[test]
fn test_recreated_medium_hides_untouched_keys() {
    let (temp, mut engine) = setup_temp_engine();

    engine.insert("a", 1).unwrap();
    engine.insert("b", 2).unwrap();

    fs::remove_file(temp.path().join("values.dat")).unwrap();
    engine.insert("c", 3).unwrap();

    assert_eq!(values(&engine, "a"), None);
    assert_eq!(values(&engine, "b"), None);
    assert_eq!(values(&engine, "c"), Some(vec![3]));
    assert_eq!(engine.key_count(), 1);
}

#[test]
fn test_delete_on_unreadable_record_drops_key() {
    let (temp, mut engine) = setup_temp_engine();

    engine.insert("a", 1).unwrap();
    engine.insert("a", 2).unwrap();
    fs::remove_file(temp.path().join("values.dat")).unwrap();

    engine.delete("a", 1).unwrap();

    assert_eq!(engine.key_count(), 0);
    assert_eq!(engine.stats().unwrap().keys, 0);
    assert_eq!(values(&engine, "a"), None);
}

#[test]
fn test_corrupt_record_header_starts_fresh_record() {
    let (temp, mut engine) = setup_temp_engine();

    engine.insert("a", 1).unwrap();
    engine.insert("a", 2).unwrap();
    engine.insert("b", 3).unwrap();
    let a = engine.index().lookup("a").unwrap();

    // Overwrite a's header with a count that disagrees with the index
    let mut file = OpenOptions::new()
        .write(true)
        .open(temp.path().join("values.dat"))
        .unwrap();
    file.seek(SeekFrom::Start(a.offset)).unwrap();
    file.write_all(&9u32.to_le_bytes()).unwrap();
    drop(file);

    assert_eq!(values(&engine, "a"), None);

    engine.insert("a", 7).unwrap();

    let relocated = engine.index().lookup("a").unwrap();
    assert_ne!(relocated.offset, a.offset);
    assert_eq!(values(&engine, "a"), Some(vec![7]));
    assert_eq!(values(&engine, "b"), Some(vec![3]));
}

#[test]
fn test_open_drops_entries_past_end_of_medium() {
    let (temp, mut engine) = setup_temp_engine();

    engine.insert("a", 1).unwrap();
    for v in 1..=3 {
        engine.insert("b", v).unwrap();
    }
    engine.close().unwrap();

    // Keep only a's 8-byte record
    let file = OpenOptions::new()
        .write(true)
        .open(temp.path().join("values.dat"))
        .unwrap();
    file.set_len(8).unwrap();
    drop(file);

    let mut engine = Engine::open_path(temp.path()).unwrap();

    assert_eq!(engine.key_count(), 1);
    assert_eq!(values(&engine, "a"), Some(vec![1]));
    assert_eq!(values(&engine, "b"), None);

    engine.insert("b", 9).unwrap();
    assert_eq!(values(&engine, "a"), Some(vec![1]));
    assert_eq!(values(&engine, "b"), Some(vec![9]));
}

// =============================================================================
// Compaction / Stats Tests
// =============================================================================

#[test]
fn test_stats_track_dead_space() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.insert("a", 1).unwrap();
    engine.insert("a", 2).unwrap(); // relocates, 8 bytes dead
    engine.insert("b", 1).unwrap();
    engine.delete("b", 1).unwrap(); // 8 bytes dead

    let stats = engine.stats().unwrap();

    assert_eq!(stats.keys, 1);
    assert_eq!(stats.live_bytes, 12);
    assert_eq!(stats.medium_bytes, 8 + 12 + 8);
    assert_eq!(stats.dead_bytes, 16);
}

#[test]
fn test_compact_preserves_contents_and_drops_dead_space() {
    let (temp, mut engine) = setup_temp_engine();

    for v in 0..20 {
        engine.insert("a", v).unwrap();
        engine.insert("b", v * 2).unwrap();
    }
    for v in 0..10 {
        engine.delete("a", v).unwrap();
    }
    engine.insert("c", 1).unwrap();
    engine.delete("c", 1).unwrap();

    let before_a = values(&engine, "a");
    let before_b = values(&engine, "b");

    let stats = engine.compact().unwrap();

    assert_eq!(stats.records, 2);
    assert_eq!(stats.dropped, 0);
    assert!(stats.bytes_after < stats.bytes_before);
    assert_eq!(engine.stats().unwrap().dead_bytes, 0);
    assert_eq!(values(&engine, "a"), before_a);
    assert_eq!(values(&engine, "b"), before_b);

    // Compaction saved the index: reopening without close sees the new layout
    drop(engine);
    let engine = Engine::open_path(temp.path()).unwrap();
    assert_eq!(values(&engine, "a"), before_a);
    assert_eq!(values(&engine, "b"), before_b);
    assert_eq!(values(&engine, "c"), None);
}

#[test]
fn test_compact_then_mutate() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.insert("a", 1).unwrap();
    engine.insert("b", 1).unwrap();
    engine.insert("a", 2).unwrap();
    engine.compact().unwrap();

    engine.insert("a", 3).unwrap();
    engine.delete("b", 1).unwrap();
    engine.insert("b", 5).unwrap();

    assert_eq!(values(&engine, "a"), Some(vec![1, 2, 3]));
    assert_eq!(values(&engine, "b"), Some(vec![5]));
}
