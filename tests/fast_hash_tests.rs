//! Tests for the default hasher and the `fxhash` / `ahash` feature flags.
//!
//! Whatever hasher the features select, hashing must be deterministic for the
//! lifetime of a map, and lookups must agree across independently built maps.

use hamtrie::persistent::{DefaultHashBuilder, PersistentHashMap, PersistentHashSet};
use rstest::rstest;
use std::hash::{BuildHasher, BuildHasherDefault};

// =============================================================================
// Hasher Selection
// =============================================================================

#[cfg(feature = "fxhash")]
#[rstest]
fn test_fxhash_feature_selects_fx_hasher() {
    let _: BuildHasherDefault<rustc_hash::FxHasher> = DefaultHashBuilder::default();
}

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
#[rstest]
fn test_ahash_feature_selects_ahasher() {
    let _: BuildHasherDefault<ahash::AHasher> = DefaultHashBuilder::default();
}

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
#[rstest]
fn test_default_hasher_is_std() {
    let _: BuildHasherDefault<std::collections::hash_map::DefaultHasher> =
        DefaultHashBuilder::default();
}

/// Two default builders must hash equal keys identically, otherwise union of
/// independently built maps could not line their tries up.
#[rstest]
#[case("key")]
#[case("")]
#[case("a much longer key with spaces")]
fn test_default_builders_agree(#[case] key: &str) {
    let first = DefaultHashBuilder::default();
    let second = DefaultHashBuilder::default();

    assert_eq!(first.hash_one(key), second.hash_one(key));
}

// =============================================================================
// Referential Transparency Tests
// =============================================================================

#[rstest]
fn test_same_key_found_in_independent_maps() {
    let map1 = PersistentHashMap::new().insert("key".to_string(), 1);
    let map2 = PersistentHashMap::new().insert("key".to_string(), 2);

    assert_eq!(map1.get("key"), Some(&1));
    assert_eq!(map2.get("key"), Some(&2));
    assert_eq!(map1.union(&map2).get("key"), Some(&2));
}

#[rstest]
fn test_deterministic_hash_behavior() {
    let entries: Vec<(String, i32)> = vec![
        ("alpha".to_string(), 1),
        ("beta".to_string(), 2),
        ("gamma".to_string(), 3),
        ("delta".to_string(), 4),
    ];

    let map1: PersistentHashMap<String, i32> = entries.iter().cloned().collect();
    let map2: PersistentHashMap<String, i32> = entries.iter().cloned().rev().collect();

    for (key, expected_value) in &entries {
        assert_eq!(map1.get(key), Some(expected_value));
        assert_eq!(map2.get(key), Some(expected_value));
    }
    assert_eq!(map1, map2);
}

// =============================================================================
// Large Scale Tests (hash function stress test)
// =============================================================================

#[rstest]
fn test_large_scale_insert_and_retrieve() {
    const COUNT: i32 = 10_000;

    let map: PersistentHashMap<i32, i32> = (0..COUNT).map(|x| (x, x * 2)).collect();

    for i in 0..COUNT {
        assert_eq!(map.get(&i), Some(&(i * 2)), "Failed to get key {i}");
    }
    for i in COUNT..(COUNT + 100) {
        assert_eq!(map.get(&i), None, "Key {i} should not exist");
    }
    assert_eq!(map.len(), 10_000);
}

#[rstest]
fn test_string_keys_large_scale() {
    const COUNT: usize = 1_000;

    let map: PersistentHashMap<String, usize> =
        (0..COUNT).map(|i| (format!("key_{i}"), i)).collect();

    for i in 0..COUNT {
        let key = format!("key_{i}");
        assert_eq!(map.get(&key), Some(&i), "Failed to get key {key}");
    }
}

#[rstest]
fn test_hashset_large_scale() {
    const COUNT: i32 = 10_000;

    let set: PersistentHashSet<i32> = (0..COUNT).collect();

    for i in 0..COUNT {
        assert!(set.contains(&i), "Set should contain {i}");
    }
    for i in COUNT..(COUNT + 100) {
        assert!(!set.contains(&i), "Set should not contain {i}");
    }
}

// =============================================================================
// Edge Case Tests
// =============================================================================

#[rstest]
fn test_empty_string_key() {
    let map = PersistentHashMap::new().insert(String::new(), 42);

    assert_eq!(map.get(""), Some(&42));
    assert_eq!(map.len(), 1);
}

#[rstest]
fn test_similar_keys() {
    let map = PersistentHashMap::new()
        .insert("a".to_string(), 1)
        .insert("aa".to_string(), 2)
        .insert("aaa".to_string(), 3)
        .insert("aaaa".to_string(), 4);

    assert_eq!(map.get("a"), Some(&1));
    assert_eq!(map.get("aa"), Some(&2));
    assert_eq!(map.get("aaa"), Some(&3));
    assert_eq!(map.get("aaaa"), Some(&4));
}

#[rstest]
fn test_boundary_integer_keys() {
    let map: PersistentHashMap<i64, i64> = PersistentHashMap::new()
        .insert(i64::MIN, 1)
        .insert(i64::MAX, 2)
        .insert(0, 3)
        .insert(-1, 4);

    assert_eq!(map.get(&i64::MIN), Some(&1));
    assert_eq!(map.get(&i64::MAX), Some(&2));
    assert_eq!(map.get(&0), Some(&3));
    assert_eq!(map.get(&-1), Some(&4));
}
