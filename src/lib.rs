//! # hamtrie
//!
//! Persistent (immutable) hash maps and sets for Rust, built on a Hash Array
//! Mapped Trie with structural sharing.
//!
//! ## Overview
//!
//! Every update returns a new version and leaves the receiver untouched.
//! Versions share all unchanged subtrees, so keeping old versions around is
//! cheap. The crate provides:
//!
//! - **[`PersistentHashMap`](persistent::PersistentHashMap)**: key/value map
//!   with `insert`, `remove`, `get` and a right-biased `union`
//! - **[`PersistentHashSet`](persistent::PersistentHashSet)**: set facade
//!   over the map
//! - **Macros**: [`hash_map!`] and [`hash_set!`] literal builders
//!
//! ## Feature Flags
//!
//! - `arc`: Use `Arc` instead of `Rc` so maps are `Send + Sync`
//! - `serde`: `Serialize` / `Deserialize` implementations
//! - `fxhash`: Use `FxHasher` as the default hasher
//! - `ahash`: Use `AHasher` as the default hasher
//! - `full`: Enable `arc` and `serde`
//!
//! ## Example
//!
//! ```rust
//! use hamtrie::prelude::*;
//!
//! let left = PersistentHashMap::new().insert("a", 1).insert("b", 2);
//! let right = PersistentHashMap::new().insert("b", 20).insert("c", 30);
//!
//! let merged = left.union(&right);
//! assert_eq!(merged.get("a"), Some(&1));
//! assert_eq!(merged.get("b"), Some(&20)); // right side wins
//! assert_eq!(merged.get("c"), Some(&30));
//! assert_eq!(left.len(), 2); // inputs unchanged
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use hamtrie::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
    pub use crate::{hash_map, hash_set};
}

pub mod persistent;
