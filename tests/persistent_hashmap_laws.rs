//! Property-based tests for PersistentHashMap.
//!
//! This module verifies that PersistentHashMap satisfies various laws
//! and invariants using proptest.

use hamtrie::persistent::PersistentHashMap;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

// =============================================================================
// Strategy for generating test data
// =============================================================================

fn arbitrary_key() -> impl Strategy<Value = String> {
    "[a-z]{1,10}".prop_map(|s| s)
}

fn arbitrary_value() -> impl Strategy<Value = i32> {
    any::<i32>()
}

fn arbitrary_entry() -> impl Strategy<Value = (String, i32)> {
    (arbitrary_key(), arbitrary_value())
}

fn arbitrary_entries() -> impl Strategy<Value = Vec<(String, i32)>> {
    prop::collection::vec(arbitrary_entry(), 0..50)
}

/// Key whose hash only depends on `self.0 % 8`, so equal-hash collisions are
/// frequent.
#[derive(Clone, Debug, PartialEq, Eq)]
struct CrowdedKey(u16);

impl Hash for CrowdedKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0 % 8).hash(state);
    }
}

fn arbitrary_crowded_entries() -> impl Strategy<Value = Vec<(CrowdedKey, i32)>> {
    prop::collection::vec((0u16..64, any::<i32>()), 0..60).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, value)| (CrowdedKey(key), value))
            .collect()
    })
}

/// The last value written for each key.
fn last_write_model<K: Hash + Eq + Clone, V: Clone>(entries: &[(K, V)]) -> HashMap<K, V> {
    entries.iter().cloned().collect()
}

// =============================================================================
// Get-Insert Law: map.insert(k, v).get(&k) == Some(&v)
// =============================================================================

proptest! {
    #[test]
    fn prop_get_insert_law(
        entries in arbitrary_entries(),
        key in arbitrary_key(),
        value in arbitrary_value()
    ) {
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        let inserted = map.insert(key.clone(), value);

        prop_assert_eq!(inserted.get(&key), Some(&value));
    }
}

// =============================================================================
// Get-Insert-Other Law: k1 != k2 => map.insert(k1, v).get(&k2) == map.get(&k2)
// =============================================================================

proptest! {
    #[test]
    fn prop_get_insert_other_law(
        entries in arbitrary_entries(),
        key1 in arbitrary_key(),
        key2 in arbitrary_key(),
        value in arbitrary_value()
    ) {
        prop_assume!(key1 != key2);

        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        let inserted = map.insert(key1, value);

        prop_assert_eq!(inserted.get(&key2), map.get(&key2));
    }
}

// =============================================================================
// Remove-Get Law: map.remove(&k).get(&k) == None
// =============================================================================

proptest! {
    #[test]
    fn prop_remove_get_law(entries in arbitrary_entries(), key in arbitrary_key()) {
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        let removed = map.remove(&key);

        prop_assert_eq!(removed.get(&key), None);
    }
}

// =============================================================================
// Remove-Get-Other Law: k1 != k2 => map.remove(&k1).get(&k2) == map.get(&k2)
// =============================================================================

proptest! {
    #[test]
    fn prop_remove_get_other_law(
        entries in arbitrary_entries(),
        key1 in arbitrary_key(),
        key2 in arbitrary_key()
    ) {
        prop_assume!(key1 != key2);

        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        let removed = map.remove(&key1);

        prop_assert_eq!(removed.get(&key2), map.get(&key2));
    }
}

// =============================================================================
// Insert Idempotence: map.insert(k, v).insert(k, v) == map.insert(k, v)
// =============================================================================

proptest! {
    #[test]
    fn prop_insert_idempotent(
        entries in arbitrary_entries(),
        key in arbitrary_key(),
        value in arbitrary_value()
    ) {
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        let once = map.insert(key.clone(), value);
        let twice = once.insert(key, value);

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.len(), twice.len());
    }
}

// =============================================================================
// Length Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_insert_len_delta(
        entries in arbitrary_entries(),
        key in arbitrary_key(),
        value in arbitrary_value()
    ) {
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        let expected = if map.contains_key(&key) { map.len() } else { map.len() + 1 };

        prop_assert_eq!(map.insert(key, value).len(), expected);
    }

    #[test]
    fn prop_remove_len_delta(entries in arbitrary_entries(), key in arbitrary_key()) {
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        let expected = if map.contains_key(&key) { map.len() - 1 } else { map.len() };

        prop_assert_eq!(map.remove(&key).len(), expected);
    }

    #[test]
    fn prop_len_matches_distinct_keys(entries in arbitrary_entries()) {
        let unique_keys: HashSet<_> = entries.iter().map(|(key, _)| key.clone()).collect();
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();

        prop_assert_eq!(map.len(), unique_keys.len());
        prop_assert_eq!(map.is_empty(), unique_keys.is_empty());
    }
}

// =============================================================================
// Model Agreement: the map behaves like std's HashMap with last-write-wins
// =============================================================================

proptest! {
    #[test]
    fn prop_agrees_with_std_model(entries in arbitrary_entries()) {
        let model = last_write_model(&entries);
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();

        prop_assert_eq!(map.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(map.get(key), Some(value));
        }
    }

    #[test]
    fn prop_agrees_with_std_model_under_collisions(
        entries in arbitrary_crowded_entries(),
        removals in prop::collection::vec(0u16..64, 0..20)
    ) {
        let mut model = last_write_model(&entries);
        let mut map: PersistentHashMap<CrowdedKey, i32> = entries.into_iter().collect();

        for key in removals {
            let key = CrowdedKey(key);
            model.remove(&key);
            map = map.remove(&key);
        }

        prop_assert_eq!(map.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(map.get(key), Some(value));
        }
        for (key, value) in &map {
            prop_assert_eq!(model.get(key), Some(value));
        }
    }
}

// =============================================================================
// Iteration Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_iter_yields_each_key_once(entries in arbitrary_entries()) {
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        let keys: Vec<&String> = map.keys().collect();
        let unique: HashSet<&String> = keys.iter().copied().collect();

        prop_assert_eq!(keys.len(), unique.len());
        prop_assert_eq!(keys.len(), map.len());
    }

    #[test]
    fn prop_to_vec_round_trip(entries in arbitrary_entries()) {
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        let rebuilt = PersistentHashMap::from(map.to_vec());

        prop_assert_eq!(&map, &rebuilt);
    }

    #[test]
    fn prop_iter_and_for_each_agree(entries in arbitrary_crowded_entries()) {
        let map: PersistentHashMap<CrowdedKey, i32> = entries.into_iter().collect();
        let iterated: Vec<(CrowdedKey, i32)> = map.to_vec();
        let mut visited = Vec::new();
        map.for_each(|key, value| visited.push((key.clone(), *value)));

        prop_assert_eq!(iterated, visited);
    }
}

// =============================================================================
// Union Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_union_empty_left_identity(entries in arbitrary_entries()) {
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        let empty = PersistentHashMap::new();

        prop_assert_eq!(&empty.union(&map), &map);
    }

    #[test]
    fn prop_union_empty_right_identity(entries in arbitrary_entries()) {
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        let empty = PersistentHashMap::new();

        prop_assert_eq!(&map.union(&empty), &map);
    }

    #[test]
    fn prop_union_self_is_identity(entries in arbitrary_entries()) {
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();

        prop_assert_eq!(&map.union(&map), &map);
    }

    #[test]
    fn prop_union_right_bias(left in arbitrary_entries(), right in arbitrary_entries()) {
        let left_map: PersistentHashMap<String, i32> = left.iter().cloned().collect();
        let right_map: PersistentHashMap<String, i32> = right.iter().cloned().collect();
        let merged = left_map.union(&right_map);

        for (key, value) in &right_map {
            prop_assert_eq!(merged.get(key), Some(value));
        }
        for (key, value) in &left_map {
            if !right_map.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }

        let mut keys: HashSet<String> = left.into_iter().map(|(key, _)| key).collect();
        keys.extend(right.into_iter().map(|(key, _)| key));
        prop_assert_eq!(merged.len(), keys.len());
    }

    #[test]
    fn prop_union_right_bias_under_collisions(
        left in arbitrary_crowded_entries(),
        right in arbitrary_crowded_entries()
    ) {
        let left_map: PersistentHashMap<CrowdedKey, i32> = left.into_iter().collect();
        let right_map: PersistentHashMap<CrowdedKey, i32> = right.into_iter().collect();
        let merged = left_map.union(&right_map);

        let mut model: HashMap<CrowdedKey, i32> = left_map.to_vec().into_iter().collect();
        model.extend(right_map.to_vec());

        prop_assert_eq!(merged.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }

    #[test]
    fn prop_union_leaves_inputs_unchanged(
        left in arbitrary_entries(),
        right in arbitrary_entries()
    ) {
        let left_map: PersistentHashMap<String, i32> = left.into_iter().collect();
        let right_map: PersistentHashMap<String, i32> = right.into_iter().collect();
        let left_snapshot = left_map.to_vec();
        let right_snapshot = right_map.to_vec();

        let _merged = left_map.union(&right_map);

        prop_assert_eq!(left_map.to_vec(), left_snapshot);
        prop_assert_eq!(right_map.to_vec(), right_snapshot);
    }
}

// =============================================================================
// Equality Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_eq_independent_of_insertion_order(entries in arbitrary_entries()) {
        let model = last_write_model(&entries);
        let forward: PersistentHashMap<String, i32> = model.clone().into_iter().collect();
        let mut reversed_pairs: Vec<(String, i32)> = model.into_iter().collect();
        reversed_pairs.reverse();
        let backward: PersistentHashMap<String, i32> = reversed_pairs.into_iter().collect();

        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(&backward, &forward);
    }

    #[test]
    fn prop_eq_detects_changed_value(
        entries in arbitrary_entries(),
        key in arbitrary_key(),
        value in arbitrary_value()
    ) {
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        prop_assume!(map.get(&key) != Some(&value));

        let changed = map.insert(key, value);
        prop_assert_ne!(&map, &changed);
        prop_assert_ne!(&changed, &map);
    }
}

// =============================================================================
// Persistence Law: updates never modify the receiver
// =============================================================================

proptest! {
    #[test]
    fn prop_updates_preserve_original(
        entries in arbitrary_entries(),
        key in arbitrary_key(),
        value in arbitrary_value()
    ) {
        let map: PersistentHashMap<String, i32> = entries.into_iter().collect();
        let snapshot = map.to_vec();

        let _inserted = map.insert(key.clone(), value);
        let _removed = map.remove(&key);

        prop_assert_eq!(map.to_vec(), snapshot);
    }
}
