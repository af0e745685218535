//! [`Map`] is the contract shared by the single-threaded maps.

use super::{CursorState, Error};

/// Key-value container with unique keys.
///
/// [`Map`] lets [`SetView`](crate::SetView) and generic code drive a [`HashMap`](crate::HashMap)
/// and a [`TreeMap`](crate::TreeMap) alike. Insertions return a [`Result`] since tree-backed maps
/// reject keys that cannot be ordered and the null key.
///
/// # Examples
///
/// ```
/// use assoc::{HashMap, Map, TreeMap};
///
/// fn fill<M: Map<Key = u32, Value = &'static str>>(map: &mut M) {
///     assert!(map.put(2, "two").unwrap().is_none());
///     assert!(map.put(1, "one").unwrap().is_none());
///     assert_eq!(map.put(2, "deux").unwrap(), Some("two"));
/// }
///
/// let mut hashmap = HashMap::new();
/// let mut treemap = TreeMap::new();
/// fill(&mut hashmap);
/// fill(&mut treemap);
/// assert_eq!(Map::len(&hashmap), 2);
/// assert_eq!(Map::get(&treemap, &2), Some(&"deux"));
/// ```
pub trait Map {
    /// The key type.
    type Key;

    /// The value type.
    type Value;

    /// Borrowing iterator over the keyed entries.
    type Iter<'m>: Iterator<Item = (&'m Self::Key, &'m Self::Value)>
    where
        Self: 'm;

    /// Fail-fast cursor.
    type Cursor;

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncomparableKey`] if the map is ordered and the key cannot be ordered.
    fn put(&mut self, key: Self::Key, value: Self::Value) -> Result<Option<Self::Value>, Error>;

    /// Associates a value with the null key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullKeyRejected`] if the map does not support the null key.
    fn put_null(&mut self, value: Self::Value) -> Result<Option<Self::Value>, Error>;

    /// Returns a reference to the value associated with the key.
    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    /// Returns a reference to the value associated with the null key.
    fn get_null(&self) -> Option<&Self::Value>;

    /// Removes the key, returning its value.
    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value>;

    /// Removes the null key, returning its value.
    fn remove_null(&mut self) -> Option<Self::Value>;

    /// Returns `true` if the key is present.
    fn contains_key(&self, key: &Self::Key) -> bool;

    /// Returns the number of entries including the null key.
    fn len(&self) -> usize;

    /// Returns `true` if the map is empty.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    fn clear(&mut self);

    /// Returns an iterator over the keyed entries.
    fn iter(&self) -> Self::Iter<'_>;

    /// Creates a fail-fast cursor over the keyed entries.
    fn cursor(&self) -> Self::Cursor;

    /// Advances the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralChange`] if the map was structurally modified after the cursor
    /// was created other than through the cursor.
    fn cursor_next<'m>(
        &'m self,
        cursor: &mut Self::Cursor,
    ) -> Result<Option<(&'m Self::Key, &'m Self::Value)>, Error>;

    /// Removes the entry last returned by the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralChange`] as [`Map::cursor_next`] does, or
    /// [`Error::NoCurrentEntry`] if there is no entry to remove.
    fn cursor_remove(
        &mut self,
        cursor: &mut Self::Cursor,
    ) -> Result<(Self::Key, Self::Value), Error>;

    /// Returns the state of the cursor.
    fn cursor_state(cursor: &Self::Cursor) -> CursorState;
}
