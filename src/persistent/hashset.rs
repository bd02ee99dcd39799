//! Persistent (immutable) hash set based on HAMT.
//!
//! This module provides [`PersistentHashSet`], an immutable hash set
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! `PersistentHashSet` is a thin wrapper over [`PersistentHashMap`] with
//! unit values, so it inherits the trie's sharing and collision handling.
//!
//! # Examples
//!
//! ```rust
//! use hamtrie::persistent::PersistentHashSet;
//!
//! let set = PersistentHashSet::new()
//!     .insert(1)
//!     .insert(2)
//!     .insert(3);
//!
//! assert!(set.contains(&1));
//! assert!(!set.contains(&4));
//!
//! // Structural sharing: the original set is preserved
//! let updated = set.insert(4);
//! assert!(!set.contains(&4));    // Original unchanged
//! assert!(updated.contains(&4)); // New version
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use super::hashmap::{DefaultHashBuilder, PersistentHashMap, PersistentHashMapIterator};

// =============================================================================
// PersistentHashSet Definition
// =============================================================================

/// A persistent (immutable) hash set based on [`PersistentHashMap`].
///
/// # Time Complexity
///
/// | Operation   | Complexity  |
/// |-------------|-------------|
/// | `new`       | O(1)        |
/// | `contains`  | O(log32 N)  |
/// | `insert`    | O(log32 N)  |
/// | `remove`    | O(log32 N)  |
/// | `len`       | O(N)        |
/// | `is_empty`  | O(1)        |
/// | `union`     | O(n + m)    |
///
/// # Examples
///
/// ```rust
/// use hamtrie::persistent::PersistentHashSet;
///
/// let set = PersistentHashSet::singleton(42);
/// assert!(set.contains(&42));
/// assert!(!set.contains(&0));
/// ```
pub struct PersistentHashSet<T, S = DefaultHashBuilder> {
    inner: PersistentHashMap<T, (), S>,
}

impl<T, S: Clone> Clone for PersistentHashSet<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> PersistentHashSet<T> {
    /// Creates a new empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamtrie::persistent::PersistentHashSet;
    ///
    /// let set: PersistentHashSet<i32> = PersistentHashSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: PersistentHashMap::new(),
        }
    }
}

impl<T: Clone + Hash + Eq> PersistentHashSet<T> {
    /// Creates a set containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().insert(element)
    }
}

impl<T, S> PersistentHashSet<T, S> {
    /// Creates a new empty set that hashes elements with `hash_builder`.
    #[inline]
    #[must_use]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            inner: PersistentHashMap::with_hasher(hash_builder),
        }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over the elements.
    #[must_use]
    pub fn iter(&self) -> PersistentHashSetIterator<'_, T> {
        PersistentHashSetIterator {
            inner: self.inner.iter(),
        }
    }
}

impl<T: Hash + Eq, S: BuildHasher> PersistentHashSet<T, S> {
    /// Returns `true` if the set contains the specified element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamtrie::persistent::PersistentHashSet;
    ///
    /// let set = PersistentHashSet::new()
    ///     .insert("hello".to_string())
    ///     .insert("world".to_string());
    ///
    /// // Can use &str to look up String elements
    /// assert!(set.contains("hello"));
    /// assert!(!set.contains("other"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains_key(element)
    }
}

impl<T: Clone + Hash + Eq, S: BuildHasher + Clone> PersistentHashSet<T, S> {
    /// Inserts an element into the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamtrie::persistent::PersistentHashSet;
    ///
    /// let set1 = PersistentHashSet::new().insert(1);
    /// let set2 = set1.insert(2);
    ///
    /// assert_eq!(set1.len(), 1); // Original unchanged
    /// assert_eq!(set2.len(), 2); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        Self {
            inner: self.inner.insert(element, ()),
        }
    }

    /// Removes an element from the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamtrie::persistent::PersistentHashSet;
    ///
    /// let set = PersistentHashSet::new().insert(1).insert(2);
    /// let removed = set.remove(&1);
    ///
    /// assert_eq!(set.len(), 2);      // Original unchanged
    /// assert_eq!(removed.len(), 1);  // New version
    /// assert!(!removed.contains(&1));
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, element: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        Self {
            inner: self.inner.remove(element),
        }
    }

    /// Returns the union of two sets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamtrie::persistent::PersistentHashSet;
    ///
    /// let set1: PersistentHashSet<i32> = [1, 2, 3].into_iter().collect();
    /// let set2: PersistentHashSet<i32> = [3, 4, 5].into_iter().collect();
    ///
    /// assert_eq!(set1.union(&set2).len(), 5);
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            inner: self.inner.union(&other.inner),
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over elements of a [`PersistentHashSet`].
pub struct PersistentHashSetIterator<'a, T> {
    inner: PersistentHashMapIterator<'a, T, ()>,
}

impl<'a, T> Iterator for PersistentHashSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, _)| element)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, S: Default> Default for PersistentHashSet<T, S> {
    #[inline]
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> FromIterator<T> for PersistentHashSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|element| (element, ())).collect(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a PersistentHashSet<T, S> {
    type Item = &'a T;
    type IntoIter = PersistentHashSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Hash + Eq, S: BuildHasher> PartialEq for PersistentHashSet<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: Hash + Eq, S: BuildHasher> Eq for PersistentHashSet<T, S> {}

impl<T: fmt::Debug, S> fmt::Debug for PersistentHashSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, S> fmt::Display for PersistentHashSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, S> serde::Serialize for PersistentHashSet<T, S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
struct PersistentHashSetVisitor<T, S> {
    marker: std::marker::PhantomData<fn() -> PersistentHashSet<T, S>>,
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::de::Visitor<'de> for PersistentHashSetVisitor<T, S>
where
    T: serde::Deserialize<'de> + Clone + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    type Value = PersistentHashSet<T, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut sequence: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = PersistentHashSet::default();
        while let Some(element) = sequence.next_element()? {
            set = set.insert(element);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::Deserialize<'de> for PersistentHashSet<T, S>
where
    T: serde::Deserialize<'de> + Clone + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentHashSetVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
