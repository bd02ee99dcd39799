//! Trie nodes and the recursive HAMT algorithms.
//!
//! A trie is a tree of [`Node`] values shared through [`ReferenceCounter`].
//! Every operation consumes 5 bits of the key's 32-bit hash per level, lowest
//! bits first, and returns a new root that shares all untouched subtrees with
//! its input.
//!
//! Entries always live at the bottom of the trie: inserting into an empty
//! slot builds a *leaf chain*, a run of single-child branches down to the
//! depth where the hash is exhausted. Two tries therefore have the same
//! shape wherever they hold keys with the same hash prefix, which lets
//! [`Node::union`] merge them branch by branch.
//!
//! ```text
//! shift:   0      5      10     15     20     25     30     35
//!          Branch Branch Branch Branch Branch Branch Branch Leaf | Collision
//! ```

use std::borrow::Borrow;
use std::fmt;

use arrayvec::ArrayVec;

use super::ReferenceCounter;
use super::bucket::{BucketIterator, CollisionBucket};
use super::sparse::SparseTable;

// =============================================================================
// Constants
// =============================================================================

/// Bits consumed per trie level.
pub(crate) const BITS_PER_LEVEL: u32 = 5;

/// Width of the hash driving the trie.
pub(crate) const HASH_BITS: u32 = 32;

/// Mask extracting one digit.
const DIGIT_MASK: u32 = (1 << BITS_PER_LEVEL) - 1;

/// Number of branch levels (shifts 0, 5, ..., 30).
pub(crate) const MAX_BRANCH_DEPTH: usize = HASH_BITS.div_ceil(BITS_PER_LEVEL) as usize;

/// Deepest traversal stack: every branch level plus the bottom entry.
const TRAVERSAL_DEPTH: usize = MAX_BRANCH_DEPTH + 1;

/// Extracts the digit selecting a child at `shift`.
#[inline]
pub(crate) const fn digit(hash: u32, shift: u32) -> u32 {
    debug_assert!(shift < HASH_BITS);
    (hash >> shift) & DIGIT_MASK
}

// =============================================================================
// Node Definition
// =============================================================================

/// Shared handle to a node.
pub(crate) type NodeRef<K, V> = ReferenceCounter<Node<K, V>>;

/// A node of the trie.
pub(crate) enum Node<K, V> {
    /// No entries.
    Empty,
    /// Exactly one entry.
    Leaf { hash: u32, key: K, value: V },
    /// Two or more entries whose full hashes are identical.
    Collision {
        hash: u32,
        bucket: CollisionBucket<K, V>,
    },
    /// Up to 32 children, one per digit.
    Branch(SparseTable<NodeRef<K, V>>),
}

impl<K, V> Node<K, V> {
    /// Creates a shared empty node.
    pub(crate) fn empty() -> NodeRef<K, V> {
        ReferenceCounter::new(Self::Empty)
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Counts entries by walking the whole subtree.
    pub(crate) fn size(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Leaf { .. } => 1,
            Self::Collision { bucket, .. } => bucket.len(),
            Self::Branch(children) => children.iter().map(|child| child.size()).sum(),
        }
    }

    /// Looks up `key`, whose hash is `hash`, below this node at `shift`.
    pub(crate) fn find<Q>(&self, key: &Q, hash: u32, shift: u32) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self {
            Self::Empty => None,
            Self::Leaf {
                hash: leaf_hash,
                key: leaf_key,
                value,
            } => (*leaf_hash == hash && leaf_key.borrow() == key).then_some(value),
            Self::Collision {
                hash: bucket_hash,
                bucket,
            } => {
                if *bucket_hash == hash {
                    bucket.find(key)
                } else {
                    None
                }
            }
            Self::Branch(children) => children
                .get(digit(hash, shift))
                .and_then(|child| child.find(key, hash, shift + BITS_PER_LEVEL)),
        }
    }

    /// Visits every entry depth first, branches in ascending digit order.
    pub(crate) fn for_each<F>(&self, visitor: &mut F)
    where
        F: FnMut(&K, &V),
    {
        match self {
            Self::Empty => {}
            Self::Leaf { key, value, .. } => visitor(key, value),
            Self::Collision { bucket, .. } => bucket.for_each(|key, value| visitor(key, value)),
            Self::Branch(children) => children.for_each(|_, child| child.for_each(&mut *visitor)),
        }
    }

    /// Like [`Node::for_each`], also passing each entry's hash.
    fn for_each_hashed<F>(&self, visitor: &mut F)
    where
        F: FnMut(u32, &K, &V),
    {
        match self {
            Self::Empty => {}
            Self::Leaf { hash, key, value } => visitor(*hash, key, value),
            Self::Collision { hash, bucket } => {
                bucket.for_each(|key, value| visitor(*hash, key, value));
            }
            Self::Branch(children) => children.for_each(|_, child| child.for_each_hashed(&mut *visitor)),
        }
    }

    /// Returns a lazy depth-first iterator over this subtree.
    pub(crate) fn iter(&self) -> NodeIterator<'_, K, V> {
        NodeIterator::new(self)
    }
}

impl<K: Clone + Eq, V: Clone> Node<K, V> {
    /// Wraps `bottom` in single-child branches from `shift` down to the
    /// exhausted depth.
    fn chain(hash: u32, shift: u32, bottom: NodeRef<K, V>) -> NodeRef<K, V> {
        if shift >= HASH_BITS {
            bottom
        } else {
            let inner = Self::chain(hash, shift + BITS_PER_LEVEL, bottom);
            ReferenceCounter::new(Self::Branch(SparseTable::singleton(
                digit(hash, shift),
                inner,
            )))
        }
    }

    fn leaf_chain(hash: u32, shift: u32, key: K, value: V) -> NodeRef<K, V> {
        Self::chain(
            hash,
            shift,
            ReferenceCounter::new(Self::Leaf { hash, key, value }),
        )
    }

    /// Returns `node` with `key` bound to `value`; the new value always wins.
    pub(crate) fn add(
        node: &NodeRef<K, V>,
        key: K,
        value: V,
        hash: u32,
        shift: u32,
    ) -> NodeRef<K, V> {
        match &**node {
            Self::Empty => Self::leaf_chain(hash, shift, key, value),
            Self::Leaf {
                hash: leaf_hash,
                key: leaf_key,
                value: leaf_value,
            } => {
                if *leaf_hash == hash && *leaf_key == key {
                    ReferenceCounter::new(Self::Leaf { hash, key, value })
                } else if *leaf_hash == hash {
                    log::trace!("hash {hash:#010x} collided, forming a two-entry bucket");
                    let bucket = CollisionBucket::pair(
                        (key, value),
                        (leaf_key.clone(), leaf_value.clone()),
                    );
                    ReferenceCounter::new(Self::Collision { hash, bucket })
                } else {
                    Self::add_beside(node, *leaf_hash, key, value, hash, shift)
                }
            }
            Self::Collision {
                hash: bucket_hash,
                bucket,
            } => {
                if *bucket_hash == hash {
                    ReferenceCounter::new(Self::Collision {
                        hash,
                        bucket: bucket.insert(key, value),
                    })
                } else {
                    Self::add_beside(node, *bucket_hash, key, value, hash, shift)
                }
            }
            Self::Branch(children) => {
                let digit = digit(hash, shift);
                let next_shift = shift + BITS_PER_LEVEL;
                let table = match children.get(digit) {
                    Some(child) => {
                        children.replace(digit, Self::add(child, key, value, hash, next_shift))
                    }
                    None => children.insert(digit, Self::leaf_chain(hash, next_shift, key, value)),
                };
                ReferenceCounter::new(Self::Branch(table))
            }
        }
    }

    /// Adds an entry next to a bottom node whose hash differs from `hash`.
    ///
    /// Leaf chains keep bottom nodes at the exhausted depth, so this only
    /// runs for a bottom node found above it.
    fn add_beside(
        node: &NodeRef<K, V>,
        node_hash: u32,
        key: K,
        value: V,
        hash: u32,
        shift: u32,
    ) -> NodeRef<K, V> {
        assert!(
            shift < HASH_BITS,
            "distinct hashes {node_hash:#010x} and {hash:#010x} share every digit"
        );
        let rehomed = Self::chain(node_hash, shift, ReferenceCounter::clone(node));
        Self::add(&rehomed, key, value, hash, shift)
    }

    /// Returns `node` without `key`.
    ///
    /// When `key` is absent the result is `node` itself, so callers can
    /// detect a no-op with [`ReferenceCounter::ptr_eq`].
    pub(crate) fn remove<Q>(node: &NodeRef<K, V>, key: &Q, hash: u32, shift: u32) -> NodeRef<K, V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match &**node {
            Self::Empty => ReferenceCounter::clone(node),
            Self::Leaf {
                hash: leaf_hash,
                key: leaf_key,
                ..
            } => {
                if *leaf_hash == hash && leaf_key.borrow() == key {
                    Self::empty()
                } else {
                    ReferenceCounter::clone(node)
                }
            }
            Self::Collision {
                hash: bucket_hash,
                bucket,
            } => {
                if *bucket_hash != hash {
                    return ReferenceCounter::clone(node);
                }
                match bucket.remove(key) {
                    None => ReferenceCounter::clone(node),
                    Some(None) => Self::empty(),
                    Some(Some(reduced)) => {
                        let demoted = reduced.sole_entry().map(|(key, value)| Self::Leaf {
                            hash,
                            key: key.clone(),
                            value: value.clone(),
                        });
                        ReferenceCounter::new(demoted.unwrap_or(Self::Collision {
                            hash,
                            bucket: reduced,
                        }))
                    }
                }
            }
            Self::Branch(children) => {
                let digit = digit(hash, shift);
                let Some(child) = children.get(digit) else {
                    return ReferenceCounter::clone(node);
                };
                let updated = Self::remove(child, key, hash, shift + BITS_PER_LEVEL);
                if ReferenceCounter::ptr_eq(&updated, child) {
                    ReferenceCounter::clone(node)
                } else if updated.is_empty() {
                    children
                        .remove(digit)
                        .map_or_else(Self::empty, |table| {
                            ReferenceCounter::new(Self::Branch(table))
                        })
                } else {
                    ReferenceCounter::new(Self::Branch(children.replace(digit, updated)))
                }
            }
        }
    }

    /// Merges two subtrees rooted at the same `shift`.
    ///
    /// Values from `right` win on every conflicting key.
    pub(crate) fn union(left: &NodeRef<K, V>, right: &NodeRef<K, V>, shift: u32) -> NodeRef<K, V> {
        if ReferenceCounter::ptr_eq(left, right) {
            return ReferenceCounter::clone(right);
        }
        match (&**left, &**right) {
            (_, Self::Empty) => ReferenceCounter::clone(left),
            (Self::Empty, _) => ReferenceCounter::clone(right),
            (_, Self::Leaf { hash, key, value }) => {
                Self::add(left, key.clone(), value.clone(), *hash, shift)
            }
            (Self::Leaf { hash, key, value }, _) => {
                if right.find(key, *hash, shift).is_some() {
                    ReferenceCounter::clone(right)
                } else {
                    Self::add(right, key.clone(), value.clone(), *hash, shift)
                }
            }
            (Self::Branch(left_children), Self::Branch(right_children)) => {
                let next_shift = shift + BITS_PER_LEVEL;
                let table = left_children.union(right_children, |left_child, right_child| {
                    Self::union(left_child, right_child, next_shift)
                });
                ReferenceCounter::new(Self::Branch(table))
            }
            _ => {
                log::trace!("union at shift {shift} folding mismatched nodes");
                let mut merged = ReferenceCounter::clone(right);
                left.for_each_hashed(&mut |hash, key: &K, value: &V| {
                    if right.find(key, hash, shift).is_none() {
                        merged = Self::add(&merged, key.clone(), value.clone(), hash, shift);
                    }
                });
                merged
            }
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Node<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => formatter.write_str("Empty"),
            Self::Leaf { hash, key, value } => formatter
                .debug_struct("Leaf")
                .field("hash", &format_args!("{hash:#010x}"))
                .field("key", key)
                .field("value", value)
                .finish(),
            Self::Collision { hash, bucket } => formatter
                .debug_struct("Collision")
                .field("hash", &format_args!("{hash:#010x}"))
                .field("bucket", bucket)
                .finish(),
            Self::Branch(children) => formatter.debug_tuple("Branch").field(children).finish(),
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// One level of an in-progress traversal.
enum Frame<'a, K, V> {
    Leaf(Option<(&'a K, &'a V)>),
    Bucket(BucketIterator<'a, K, V>),
    Branch(std::slice::Iter<'a, NodeRef<K, V>>),
}

/// A lazy depth-first iterator over the entries below a node.
///
/// The stack never exceeds the trie height, so it lives inline.
pub(crate) struct NodeIterator<'a, K, V> {
    stack: ArrayVec<Frame<'a, K, V>, TRAVERSAL_DEPTH>,
}

impl<'a, K, V> NodeIterator<'a, K, V> {
    fn new(root: &'a Node<K, V>) -> Self {
        let mut iterator = Self {
            stack: ArrayVec::new(),
        };
        iterator.descend(root);
        iterator
    }

    fn descend(&mut self, node: &'a Node<K, V>) {
        let frame = match node {
            Node::Empty => return,
            Node::Leaf { key, value, .. } => Frame::Leaf(Some((key, value))),
            Node::Collision { bucket, .. } => Frame::Bucket(bucket.iter()),
            Node::Branch(children) => Frame::Branch(children.iter()),
        };
        self.stack.push(frame);
    }
}

impl<'a, K, V> Iterator for NodeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.stack.last_mut()? {
                Frame::Leaf(slot) => slot.take(),
                Frame::Bucket(pairs) => pairs.next(),
                Frame::Branch(children) => {
                    if let Some(child) = children.next() {
                        self.descend(child);
                        continue;
                    }
                    None
                }
            };
            match entry {
                Some(entry) => return Some(entry),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
