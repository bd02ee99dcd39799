//! Collision bucket for keys sharing an identical full hash.
//!
//! A [`CollisionBucket`] is a persistent singly-linked list of key-value
//! pairs, most recently added first. Lookup is a linear equality scan; the
//! caller has already established that every key in the bucket has the same
//! hash, so only [`Eq`] is needed here.
//!
//! Updates rebuild the cells in front of the affected pair and share the
//! untouched tail with the previous version:
//!
//! ```text
//! bucket1: (c, 3) -> (b, 2) -> (a, 1)
//! bucket2 = bucket1.insert(b, 20): (c, 3) -> (b, 20) -> [(a, 1)]  // shares (a, 1)
//! ```

use std::borrow::Borrow;
use std::fmt;

use super::ReferenceCounter;

/// A single cell of the bucket list.
struct Cell<K, V> {
    key: K,
    value: V,
    next: Option<ReferenceCounter<Self>>,
}

/// A non-empty persistent list of colliding key-value pairs.
pub(crate) struct CollisionBucket<K, V> {
    head: ReferenceCounter<Cell<K, V>>,
    length: usize,
}

impl<K, V> Clone for CollisionBucket<K, V> {
    fn clone(&self) -> Self {
        Self {
            head: ReferenceCounter::clone(&self.head),
            length: self.length,
        }
    }
}

impl<K, V> CollisionBucket<K, V> {
    /// Creates a bucket holding one pair.
    #[cfg(test)]
    pub(crate) fn singleton(key: K, value: V) -> Self {
        Self {
            head: ReferenceCounter::new(Cell {
                key,
                value,
                next: None,
            }),
            length: 1,
        }
    }

    /// Creates a bucket of two pairs, `first` ahead of `second`.
    pub(crate) fn pair(first: (K, V), second: (K, V)) -> Self {
        let tail = ReferenceCounter::new(Cell {
            key: second.0,
            value: second.1,
            next: None,
        });
        Self {
            head: ReferenceCounter::new(Cell {
                key: first.0,
                value: first.1,
                next: Some(tail),
            }),
            length: 2,
        }
    }

    /// Number of pairs; O(1).
    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.length
    }

    /// Iterates pairs most recent first.
    pub(crate) fn iter(&self) -> BucketIterator<'_, K, V> {
        BucketIterator {
            current: Some(&self.head),
        }
    }

    /// Visits pairs most recent first.
    pub(crate) fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self.iter() {
            visitor(key, value);
        }
    }

    /// Returns the only pair of a single-entry bucket.
    pub(crate) fn sole_entry(&self) -> Option<(&K, &V)> {
        if self.length == 1 {
            Some((&self.head.key, &self.head.value))
        } else {
            None
        }
    }

    /// Looks up `key` by equality.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.iter()
            .find(|(entry_key, _)| (*entry_key).borrow() == key)
            .map(|(_, value)| value)
    }

    /// Dense position of `key`, if present.
    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.iter()
            .position(|(entry_key, _)| entry_key.borrow() == key)
    }
}

impl<K: Clone + Eq, V: Clone> CollisionBucket<K, V> {
    /// Rebuilds the first `count` cells on top of `tail`.
    fn rebuild_prefix(
        &self,
        count: usize,
        tail: Option<ReferenceCounter<Cell<K, V>>>,
    ) -> Option<ReferenceCounter<Cell<K, V>>> {
        let prefix: Vec<(&K, &V)> = self.iter().take(count).collect();
        prefix.into_iter().rev().fold(tail, |next, (key, value)| {
            Some(ReferenceCounter::new(Cell {
                key: key.clone(),
                value: value.clone(),
                next,
            }))
        })
    }

    /// Returns the cell at dense position `index`.
    fn cell_at(&self, index: usize) -> &Cell<K, V> {
        let mut cell = &*self.head;
        for _ in 0..index {
            cell = cell
                .next
                .as_deref()
                .unwrap_or_else(|| unreachable!("collision bucket shorter than its length"));
        }
        cell
    }

    /// Returns a bucket with `key` bound to `value`.
    ///
    /// An existing key keeps its position and takes the new value;
    /// a new key is prepended.
    pub(crate) fn insert(&self, key: K, value: V) -> Self {
        match self.position(&key) {
            Some(index) => {
                let old = self.cell_at(index);
                let replaced = ReferenceCounter::new(Cell {
                    key,
                    value,
                    next: old.next.clone(),
                });
                let head = self
                    .rebuild_prefix(index, Some(replaced))
                    .unwrap_or_else(|| unreachable!("rebuilt bucket is empty"));
                Self {
                    head,
                    length: self.length,
                }
            }
            None => Self {
                head: ReferenceCounter::new(Cell {
                    key,
                    value,
                    next: Some(ReferenceCounter::clone(&self.head)),
                }),
                length: self.length + 1,
            },
        }
    }

    /// Returns the bucket without `key`.
    ///
    /// The outer `Option` is `None` when `key` is absent. The inner one is
    /// `None` when removing `key` empties the bucket.
    pub(crate) fn remove<Q>(&self, key: &Q) -> Option<Option<Self>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let index = self.position(key)?;
        let tail = self.cell_at(index).next.clone();
        Some(self.rebuild_prefix(index, tail).map(|head| Self {
            head,
            length: self.length - 1,
        }))
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CollisionBucket<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over the pairs of a [`CollisionBucket`].
pub(crate) struct BucketIterator<'a, K, V> {
    current: Option<&'a ReferenceCounter<Cell<K, V>>>,
}

impl<K, V> Clone for BucketIterator<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            current: self.current,
        }
    }
}

impl<'a, K, V> Iterator for BucketIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.current?;
        self.current = cell.next.as_ref();
        Some((&cell.key, &cell.value))
    }
}

// =============================================================================
// Tests
// =============================================================================
