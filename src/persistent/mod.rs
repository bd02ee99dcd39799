//! Persistent (immutable) hash-based collections.
//!
//! This module provides immutable collections built on a Hash Array Mapped
//! Trie that use structural sharing to minimize copying:
//!
//! - [`PersistentHashMap`]: Persistent hash map (HAMT)
//! - [`PersistentHashSet`]: Persistent hash set (based on HAMT)
//!
//! # Structural Sharing
//!
//! Every update builds a new path from the changed entry up to a new root and
//! reuses every untouched subtree, so older versions stay valid and cheap.
//!
//! # Examples
//!
//! ## `PersistentHashMap`
//!
//! ```rust
//! use hamtrie::persistent::PersistentHashMap;
//!
//! let map = PersistentHashMap::new()
//!     .insert("one".to_string(), 1)
//!     .insert("two".to_string(), 2);
//! assert_eq!(map.get("one"), Some(&1));
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert("one".to_string(), 100);
//! assert_eq!(map.get("one"), Some(&1));       // Original unchanged
//! assert_eq!(updated.get("one"), Some(&100)); // New version
//! ```
//!
//! ## `PersistentHashSet`
//!
//! ```rust
//! use hamtrie::persistent::PersistentHashSet;
//!
//! let set = PersistentHashSet::new()
//!     .insert(1)
//!     .insert(2)
//!     .insert(3);
//! assert!(set.contains(&1));
//!
//! let other: PersistentHashSet<i32> = [2, 3, 4].into_iter().collect();
//! assert_eq!(set.union(&other).len(), 4); // {1, 2, 3, 4}
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

#[macro_use]
mod macros;

mod bucket;
mod hashmap;
mod hashset;
mod node;
mod sparse;

pub use hashmap::DefaultHashBuilder;
pub use hashmap::PersistentHashMap;
pub use hashmap::PersistentHashMapIntoIterator;
pub use hashmap::PersistentHashMapIterator;
pub use hashset::PersistentHashSet;
pub use hashset::PersistentHashSetIterator;

// =============================================================================
// Tests
// =============================================================================
