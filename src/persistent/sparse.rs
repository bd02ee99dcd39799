//! Bitmap-indexed sparse child table.
//!
//! A [`SparseTable`] maps a 5-bit digit (0-31) to a value using a 32-bit
//! presence bitmap and a dense slice sized exactly to the population count.
//! The dense position of a digit is the number of set bits below it.
//!
//! ```text
//! bitmap:  0b0000_0000_0000_0000_0000_0100_0010_0001
//!                                      ^    ^     ^
//! digits:                             10    5     0
//! entries: [child(0), child(5), child(10)]
//! ```
//!
//! The dense slice lives behind a [`ReferenceCounter`], so cloning a table is
//! O(1) and every "update" copies the slice into a fresh allocation. A table
//! is never mutated after construction.

use std::fmt;

use super::ReferenceCounter;

/// Number of distinct digits (2^5).
pub(crate) const TABLE_WIDTH: u32 = 32;

/// Returns the single-bit mask selecting `digit`.
#[inline]
const fn digit_bit(digit: u32) -> u32 {
    1u32 << digit
}

/// A persistent bitmap-compressed table of up to 32 entries.
pub(crate) struct SparseTable<T> {
    bitmap: u32,
    entries: ReferenceCounter<[T]>,
}

impl<T> Clone for SparseTable<T> {
    fn clone(&self) -> Self {
        Self {
            bitmap: self.bitmap,
            entries: ReferenceCounter::clone(&self.entries),
        }
    }
}

impl<T> SparseTable<T> {
    /// Returns `true` if `digit` is populated.
    #[inline]
    pub(crate) const fn has(&self, digit: u32) -> bool {
        debug_assert!(digit < TABLE_WIDTH);
        self.bitmap & digit_bit(digit) != 0
    }

    /// Returns the dense position `digit` occupies (or would occupy).
    #[inline]
    pub(crate) const fn index_of(&self, digit: u32) -> usize {
        (self.bitmap & (digit_bit(digit) - 1)).count_ones() as usize
    }

    /// Returns the entry stored under `digit`.
    #[inline]
    pub(crate) fn get(&self, digit: u32) -> Option<&T> {
        if self.has(digit) {
            Some(&self.entries[self.index_of(digit)])
        } else {
            None
        }
    }

    /// Returns the population count.
    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.bitmap.count_ones() as usize
    }

    #[cfg(test)]
    pub(crate) const fn bitmap(&self) -> u32 {
        self.bitmap
    }

    /// Creates a table holding exactly one entry.
    pub(crate) fn singleton(digit: u32, entry: T) -> Self {
        assert!(digit < TABLE_WIDTH, "digit {digit} out of range");
        Self {
            bitmap: digit_bit(digit),
            entries: ReferenceCounter::from(vec![entry]),
        }
    }

    /// Iterates entries in ascending digit order.
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Iterates `(digit, entry)` pairs in ascending digit order.
    pub(crate) fn digits(&self) -> impl Iterator<Item = (u32, &T)> {
        let mut remaining = self.bitmap;
        self.entries.iter().map(move |entry| {
            let digit = remaining.trailing_zeros();
            remaining &= remaining - 1;
            (digit, entry)
        })
    }

    /// Visits every `(digit, entry)` pair in ascending digit order.
    pub(crate) fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(u32, &T),
    {
        for (digit, entry) in self.digits() {
            visitor(digit, entry);
        }
    }

    fn check_consistency(&self) {
        assert_eq!(
            self.len(),
            self.entries.len(),
            "sparse table bitmap does not match its dense array"
        );
    }
}

impl<T: Clone> SparseTable<T> {
    /// Returns a new table with `entry` inserted under the absent `digit`.
    ///
    /// # Panics
    ///
    /// Panics if `digit` is already populated.
    pub(crate) fn insert(&self, digit: u32, entry: T) -> Self {
        assert!(!self.has(digit), "digit {digit} already present");
        let position = self.index_of(digit);
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.extend_from_slice(&self.entries[..position]);
        entries.push(entry);
        entries.extend_from_slice(&self.entries[position..]);
        Self {
            bitmap: self.bitmap | digit_bit(digit),
            entries: ReferenceCounter::from(entries),
        }
    }

    /// Returns a new table with the same layout and `digit`'s entry swapped.
    ///
    /// # Panics
    ///
    /// Panics if `digit` is not populated.
    pub(crate) fn replace(&self, digit: u32, entry: T) -> Self {
        assert!(self.has(digit), "digit {digit} not present");
        let mut entries = self.entries.to_vec();
        entries[self.index_of(digit)] = entry;
        Self {
            bitmap: self.bitmap,
            entries: ReferenceCounter::from(entries),
        }
    }

    /// Returns a new table without `digit`, or `None` if it was the last one.
    ///
    /// # Panics
    ///
    /// Panics if `digit` is not populated.
    pub(crate) fn remove(&self, digit: u32) -> Option<Self> {
        assert!(self.has(digit), "digit {digit} not present");
        let bitmap = self.bitmap & !digit_bit(digit);
        if bitmap == 0 {
            return None;
        }
        let position = self.index_of(digit);
        let mut entries = Vec::with_capacity(self.entries.len() - 1);
        entries.extend_from_slice(&self.entries[..position]);
        entries.extend_from_slice(&self.entries[position + 1..]);
        Some(Self {
            bitmap,
            entries: ReferenceCounter::from(entries),
        })
    }

    /// Merges two tables digit by digit.
    ///
    /// `merge(left, right)` is called for digits present in both tables;
    /// digits present on one side keep their entry unchanged.
    pub(crate) fn union<F>(&self, other: &Self, mut merge: F) -> Self
    where
        F: FnMut(&T, &T) -> T,
    {
        self.check_consistency();
        other.check_consistency();

        let bitmap = self.bitmap | other.bitmap;
        let mut entries = Vec::with_capacity(bitmap.count_ones() as usize);
        let mut remaining = bitmap;
        let mut left = self.entries.iter();
        let mut right = other.entries.iter();

        while remaining != 0 {
            let digit = remaining.trailing_zeros();
            remaining &= remaining - 1;

            let entry = match (self.has(digit), other.has(digit)) {
                (true, true) => left
                    .next()
                    .zip(right.next())
                    .map(|(left_entry, right_entry)| merge(left_entry, right_entry)),
                (true, false) => left.next().cloned(),
                (false, true) => right.next().cloned(),
                (false, false) => None,
            }
            .unwrap_or_else(|| unreachable!("sparse table entries out of step at digit {digit}"));
            entries.push(entry);
        }

        Self {
            bitmap,
            entries: ReferenceCounter::from(entries),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseTable<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.digits()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
