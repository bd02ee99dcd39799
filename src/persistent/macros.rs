//! Literal construction macros.

/// Builds a [`PersistentHashMap`](crate::persistent::PersistentHashMap)
/// from `key => value` pairs.
///
/// Later pairs override earlier ones on duplicate keys.
///
/// # Examples
///
/// ```rust
/// use hamtrie::hash_map;
///
/// let map = hash_map! {
///     "a" => 1,
///     "b" => 2,
///     "a" => 10,
/// };
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get("a"), Some(&10));
///
/// let empty: hamtrie::persistent::PersistentHashMap<&str, i32> = hash_map! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! hash_map {
    () => {
        $crate::persistent::PersistentHashMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::persistent::PersistentHashMap::new()
            $(.insert($key, $value))+
    };
}

/// Builds a [`PersistentHashSet`](crate::persistent::PersistentHashSet)
/// from elements.
///
/// # Examples
///
/// ```rust
/// use hamtrie::hash_set;
///
/// let set = hash_set![1, 2, 3, 2];
/// assert_eq!(set.len(), 3);
/// ```
#[macro_export]
macro_rules! hash_set {
    () => {
        $crate::persistent::PersistentHashSet::new()
    };
    ($($element:expr),+ $(,)?) => {
        $crate::persistent::PersistentHashSet::new()
            $(.insert($element))+
    };
}
