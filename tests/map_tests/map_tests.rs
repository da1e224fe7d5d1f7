//! Tests for FileBackedMap
//!
//! These tests verify:
//! - Insert/get/update/remove through the key index
//! - The None key cell
//! - contains_value over live keys only
//! - values() snapshots and lazy entry iteration
//! - Slot reuse on update and slot retention on remove
//! - compact() remapping keys to rebuilt slots

use std::collections::HashMap;

use filebacked::config::Config;
use filebacked::{FileBackedMap, KeyedCollection};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_map() -> (TempDir, FileBackedMap<String, u64>) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().scratch_dir(temp_dir.path()).build();
    let map = FileBackedMap::with_config(config);
    (temp_dir, map)
}

fn key(k: &str) -> String {
    k.to_string()
}

fn fill_hundreds(map: &mut FileBackedMap<String, u64>) {
    for i in 0u64..10 {
        map.insert(i.to_string(), i * 100).unwrap();
    }
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_insert_get() {
    let (_temp, mut map) = setup_temp_map();

    assert_eq!(map.insert(key("a"), 1).unwrap(), None);

    assert_eq!(map.get(&key("a")).unwrap(), Some(1));
    assert_eq!(map.get(&key("missing")).unwrap(), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_update_reuses_slot() {
    let (_temp, mut map) = setup_temp_map();
    map.insert(key("a"), 1).unwrap();
    let size = map.file_size().unwrap();

    let previous = map.insert(key("a"), 2).unwrap();

    assert_eq!(previous, Some(1));
    assert_eq!(map.get(&key("a")).unwrap(), Some(2));
    assert_eq!(map.len(), 1);
    assert_eq!(map.orphaned_slots(), 0);
    // The new bytes are appended to the same file
    assert!(map.file_size().unwrap() > size);
}

#[test]
fn test_absent_value_for_present_key() {
    let (_temp, mut map) = setup_temp_map();

    map.insert(key("a"), None).unwrap();

    assert!(map.contains_key(&key("a")));
    assert_eq!(map.get(&key("a")).unwrap(), None);
    assert!(map.contains_value(None).unwrap());
}

#[test]
fn test_scenario_remove_even_keys() {
    let (_temp, mut map) = setup_temp_map();
    fill_hundreds(&mut map);

    for i in (0..10).step_by(2) {
        map.remove(&i.to_string()).unwrap();
    }

    assert_eq!(map.len(), 5);
    for i in (1u64..10).step_by(2) {
        assert_eq!(map.get(&i.to_string()).unwrap(), Some(i * 100));
    }
    assert!(!map.contains_key(&key("4")));
}

#[test]
fn test_remove_returns_value_and_keeps_slot() {
    let (_temp, mut map) = setup_temp_map();
    fill_hundreds(&mut map);
    let size = map.file_size().unwrap();

    assert_eq!(map.remove(&key("3")).unwrap(), Some(300));
    assert_eq!(map.remove(&key("3")).unwrap(), None);

    assert_eq!(map.orphaned_slots(), 1);
    assert_eq!(map.file_size().unwrap(), size);
}

#[test]
fn test_keys_reflect_current_mapping() {
    let (_temp, mut map) = setup_temp_map();
    map.insert(key("a"), 1).unwrap();
    map.insert(key("b"), 2).unwrap();
    map.remove(&key("a")).unwrap();

    let keys: Vec<&String> = map.keys().collect();
    assert_eq!(keys, vec![&key("b")]);
}

#[test]
fn test_insert_all_later_pairs_win() {
    let (_temp, mut map) = setup_temp_map();

    map.insert_all(vec![(key("a"), 1), (key("b"), 2), (key("a"), 3)])
        .unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&key("a")).unwrap(), Some(3));
}

// =============================================================================
// None Key Tests
// =============================================================================

#[test]
fn test_none_key_cell() {
    let (_temp, mut map) = setup_temp_map();
    assert!(!map.contains_key(None));

    assert_eq!(map.insert(None, 7).unwrap(), None);
    assert!(map.contains_key(None));
    assert_eq!(map.get(None).unwrap(), Some(7));
    assert_eq!(map.len(), 1);
    // The None key never touches the file
    assert!(map.scratch_path().is_none());

    assert_eq!(map.insert(None, 8).unwrap(), Some(7));
    assert_eq!(map.len(), 1);

    assert_eq!(map.remove(None).unwrap(), Some(8));
    assert!(!map.contains_key(None));
    assert!(map.is_empty());
}

#[test]
fn test_none_key_overwrite_leaves_other_keys() {
    let (_temp, mut map) = setup_temp_map();
    map.insert(key("k"), 5).unwrap();
    map.insert(None, 1).unwrap();
    let size = map.file_size().unwrap();

    assert_eq!(map.insert(None, 2).unwrap(), Some(1));

    assert_eq!(map.get(&key("k")).unwrap(), Some(5));
    assert_eq!(map.get(None).unwrap(), Some(2));
    assert_eq!(map.file_size().unwrap(), size);
    assert_eq!(map.len(), 2);
}

#[test]
fn test_none_key_with_absent_value() {
    let (_temp, mut map) = setup_temp_map();

    map.insert(None, None).unwrap();

    assert!(map.contains_key(None));
    assert_eq!(map.get(None).unwrap(), None);
    assert!(map.contains_value(None).unwrap());
    assert_eq!(map.len(), 1);
}

// =============================================================================
// Value Query Tests
// =============================================================================

#[test]
fn test_contains_value_ignores_removed_keys() {
    let (_temp, mut map) = setup_temp_map();
    fill_hundreds(&mut map);
    map.insert(None, 12345).unwrap();

    assert!(map.contains_value(&300).unwrap());
    assert!(map.contains_value(&12345).unwrap());

    map.remove(&key("3")).unwrap();
    assert!(!map.contains_value(&300).unwrap());
    assert!(!map.contains_value(&301).unwrap());
}

#[test]
fn test_values_snapshot() {
    let (_temp, mut map) = setup_temp_map();
    map.insert(key("a"), 1).unwrap();
    map.insert(key("b"), 2).unwrap();
    map.insert(key("c"), 1).unwrap();
    map.insert(None, 9).unwrap();
    map.insert(key("d"), 4).unwrap();
    map.remove(&key("d")).unwrap();

    let values = map.values().unwrap();

    // Duplicates collapse; the removed key's value is absent
    assert_eq!(values.len(), 3);
    assert_eq!(values.get(0).unwrap(), Some(9));
    assert!(values.contains(&1).unwrap());
    assert!(values.contains(&2).unwrap());
    assert!(!values.contains(&4).unwrap());

    // Later map changes are not reflected
    map.insert(key("e"), 5).unwrap();
    assert!(!values.contains(&5).unwrap());
    assert_ne!(values.scratch_path(), map.scratch_path());
}

#[test]
fn test_entries_iteration() {
    let (_temp, mut map) = setup_temp_map();
    fill_hundreds(&mut map);
    map.insert(None, 1).unwrap();

    let mut iter = map.iter();
    assert_eq!(iter.size_hint(), (11, Some(11)));
    assert_eq!(iter.next().unwrap().unwrap(), (None, Some(1)));

    let rest: HashMap<String, u64> = iter
        .map(|entry| {
            let (k, v) = entry.unwrap();
            (k.unwrap().clone(), v.unwrap())
        })
        .collect();
    assert_eq!(rest.len(), 10);
    assert_eq!(rest[&key("7")], 700);
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_clear() {
    let (_temp, mut map) = setup_temp_map();
    fill_hundreds(&mut map);
    map.insert(None, 1).unwrap();
    let path = map.scratch_path().unwrap().to_path_buf();

    map.clear().unwrap();

    assert!(map.is_empty());
    assert!(!map.contains_key(None));
    assert_eq!(map.file_size().unwrap(), 0);
    assert!(!path.exists());

    map.insert(key("a"), 1).unwrap();
    assert_eq!(map.get(&key("a")).unwrap(), Some(1));
}

#[test]
fn test_compact_remaps_keys() {
    let (_temp, mut map) = setup_temp_map();
    fill_hundreds(&mut map);
    for i in (0..10).step_by(2) {
        map.remove(&i.to_string()).unwrap();
    }
    map.insert(key("1"), 111).unwrap();
    map.insert(None, 42).unwrap();
    let before = map.file_size().unwrap();
    assert_eq!(map.orphaned_slots(), 5);

    map.compact().unwrap();

    assert_eq!(map.orphaned_slots(), 0);
    assert!(map.file_size().unwrap() < before);
    assert_eq!(map.len(), 6);
    assert_eq!(map.get(&key("1")).unwrap(), Some(111));
    for i in (3u64..10).step_by(2) {
        assert_eq!(map.get(&i.to_string()).unwrap(), Some(i * 100));
    }
    assert_eq!(map.get(None).unwrap(), Some(42));

    // Writes after compaction land in the new layout
    map.insert(key("100"), 1).unwrap();
    map.insert(key("3"), 3).unwrap();
    assert_eq!(map.get(&key("100")).unwrap(), Some(1));
    assert_eq!(map.get(&key("3")).unwrap(), Some(3));
    assert_eq!(map.get(&key("5")).unwrap(), Some(500));
}

// =============================================================================
// KeyedCollection Interface Tests
// =============================================================================

#[test]
fn test_keyed_collection_interface() {
    let (_temp, mut map) = setup_temp_map();
    let keyed: &mut dyn KeyedCollection<String, u64> = &mut map;

    assert_eq!(keyed.insert(Some(key("a")), Some(1)).unwrap(), None);
    assert_eq!(keyed.insert(None, Some(2)).unwrap(), None);
    assert_eq!(keyed.insert(Some(key("a")), Some(3)).unwrap(), Some(1));
    assert_eq!(keyed.len(), 2);

    assert!(keyed.contains_key(Some(&key("a"))));
    assert!(keyed.contains_key(None));
    assert!(keyed.contains_value(Some(&3)).unwrap());
    assert!(!keyed.contains_value(Some(&1)).unwrap());
    assert_eq!(keyed.get(Some(&key("a"))).unwrap(), Some(3));

    assert_eq!(keyed.remove(None).unwrap(), Some(2));
    assert_eq!(keyed.remove(Some(&key("a"))).unwrap(), Some(3));
    assert!(keyed.is_empty());

    keyed.clear().unwrap();
    assert_eq!(keyed.file_size().unwrap(), 0);
}
