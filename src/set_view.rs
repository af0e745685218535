//! [`SetView`] presents a [`Map`] with unit values as a set of keys.

use super::tree_map::{RangeIter, RangeView, RangeViewMut};
use super::{Config, CursorState, Error, HashMap, Map, TreeMap};
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::BuildHasher;
use std::iter::FusedIterator;
use std::ops::{Range, RangeBounds, RangeFrom, RangeTo};

/// Set of keys stored in a [`Map`] with unit values.
///
/// Every operation is delegated to the underlying [`Map`]: `add(key)` is `put(key, ())`, and
/// iteration yields the keys only.
///
/// # Examples
///
/// ```
/// use assoc::{HashSet, TreeSet};
///
/// let mut treeset: TreeSet<&str> = TreeSet::new();
/// for fruit in ["banana", "apple", "cherry"] {
///     assert!(treeset.add(fruit).unwrap());
/// }
/// assert!(!treeset.add("apple").unwrap());
/// assert_eq!(treeset.iter().copied().collect::<Vec<_>>(), ["apple", "banana", "cherry"]);
///
/// let mut hashset: HashSet<u64> = HashSet::new();
/// assert!(hashset.add(7).unwrap());
/// assert!(hashset.add_null().unwrap());
/// assert_eq!(hashset.len(), 2);
/// ```
pub struct SetView<M> {
    map: M,
}

/// Hash set over a [`HashMap`].
pub type HashSet<K, H = RandomState> = SetView<HashMap<K, (), H>>;

/// Ordered set over a [`TreeMap`].
pub type TreeSet<K> = SetView<TreeMap<K, ()>>;

/// An iterator over the keys of a [`SetView`].
pub struct Iter<'s, M>
where
    M: Map + 's,
{
    inner: M::Iter<'s>,
}

/// Fail-fast cursor over the keys of a [`SetView`].
///
/// # Examples
///
/// ```
/// use assoc::{CursorState, TreeSet};
///
/// let mut treeset: TreeSet<u32> = (0..6).collect();
///
/// let mut cursor = treeset.cursor();
/// while let Some(key) = cursor.next(&treeset).unwrap() {
///     if key % 2 == 1 {
///         assert!(cursor.remove(&mut treeset).is_ok());
///     }
/// }
/// assert_eq!(cursor.state(), CursorState::Exhausted);
/// assert_eq!(treeset.iter().copied().collect::<Vec<_>>(), [0, 2, 4]);
/// ```
pub struct Cursor<M>
where
    M: Map,
{
    inner: M::Cursor,
}

/// A live view of the keys of a [`TreeSet`] within a range.
pub struct RangeSet<'s, K, R> {
    view: RangeView<'s, K, (), R>,
}

/// A live view of the keys of a [`TreeSet`] within a range that can add and remove keys
/// within the range.
pub struct RangeSetMut<'s, K, R> {
    view: RangeViewMut<'s, K, (), R>,
}

/// A double-ended iterator over the keys of a [`TreeSet`] within a range.
pub struct RangeSetIter<'s, K> {
    inner: RangeIter<'s, K, ()>,
}

impl<M> SetView<M>
where
    M: Map<Value = ()>,
{
    /// Creates an empty [`SetView`].
    #[inline]
    #[must_use]
    pub fn new() -> Self
    where
        M: Default,
    {
        Self { map: M::default() }
    }

    /// Wraps a [`Map`], keeping its entries as the keys of the set.
    #[inline]
    pub fn from_map(map: M) -> Self {
        Self { map }
    }

    /// Returns the underlying [`Map`].
    #[inline]
    pub fn into_map(self) -> M {
        self.map
    }

    /// Returns a reference to the underlying [`Map`].
    #[inline]
    pub fn as_map(&self) -> &M {
        &self.map
    }

    /// Adds a key, returning `true` if the key was not present.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying [`Map`] rejects the key, e.g.,
    /// [`Error::IncomparableKey`] for a [`TreeSet`].
    #[inline]
    pub fn add(&mut self, key: M::Key) -> Result<bool, Error> {
        Ok(self.map.put(key, ())?.is_none())
    }

    /// Adds the null key, returning `true` if it was not present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullKeyRejected`] for a [`TreeSet`].
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::{Error, HashSet, TreeSet};
    ///
    /// let mut hashset: HashSet<u32> = HashSet::new();
    /// assert_eq!(hashset.add_null(), Ok(true));
    /// assert_eq!(hashset.add_null(), Ok(false));
    ///
    /// let mut treeset: TreeSet<u32> = TreeSet::new();
    /// assert_eq!(treeset.add_null(), Err(Error::NullKeyRejected));
    /// ```
    #[inline]
    pub fn add_null(&mut self) -> Result<bool, Error> {
        Ok(self.map.put_null(())?.is_none())
    }

    /// Returns `true` if the key is present.
    #[inline]
    pub fn contains(&self, key: &M::Key) -> bool {
        self.map.contains_key(key)
    }

    /// Returns `true` if the null key is present.
    #[inline]
    pub fn contains_null(&self) -> bool {
        self.map.get_null().is_some()
    }

    /// Removes the key, returning `true` if it was present.
    #[inline]
    pub fn remove(&mut self, key: &M::Key) -> bool {
        self.map.remove(key).is_some()
    }

    /// Removes the null key, returning `true` if it was present.
    #[inline]
    pub fn remove_null(&mut self) -> bool {
        self.map.remove_null().is_some()
    }

    /// Returns the number of keys including the null key.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every key.
    #[inline]
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns an iterator over the keys, excluding the null key.
    #[inline]
    pub fn iter(&self) -> Iter<'_, M> {
        Iter {
            inner: self.map.iter(),
        }
    }

    /// Creates a fail-fast [`Cursor`] over the keys, excluding the null key.
    #[inline]
    pub fn cursor(&self) -> Cursor<M> {
        Cursor {
            inner: self.map.cursor(),
        }
    }
}

impl<K, H> SetView<HashMap<K, (), H>>
where
    H: BuildHasher,
{
    /// Creates an empty [`HashSet`] with the given [`BuildHasher`].
    #[inline]
    pub fn with_hasher(build_hasher: H) -> Self {
        Self {
            map: HashMap::with_hasher(build_hasher),
        }
    }

    /// Creates an empty [`HashSet`] with the specified number of buckets and [`BuildHasher`].
    #[inline]
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: H) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, build_hasher),
        }
    }

    /// Creates an empty [`HashSet`] with the specified [`Config`] and [`BuildHasher`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the [`Config`] is invalid.
    #[inline]
    pub fn with_config_and_hasher(config: Config, build_hasher: H) -> Result<Self, Error> {
        HashMap::with_config_and_hasher(config, build_hasher).map(|map| Self { map })
    }

    /// Returns the number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }
}

impl<K> SetView<HashMap<K, (), RandomState>> {
    /// Creates an empty [`HashSet`] with the specified number of buckets.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashSet;
    ///
    /// let hashset: HashSet<u64> = HashSet::with_capacity(1000);
    /// assert_eq!(hashset.capacity(), 1024);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Creates an empty [`HashSet`] with the specified [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the [`Config`] is invalid.
    #[inline]
    pub fn with_config(config: Config) -> Result<Self, Error> {
        HashMap::with_config(config).map(|map| Self { map })
    }
}

impl<K> SetView<TreeMap<K, ()>>
where
    K: PartialOrd,
{
    /// Returns the smallest key.
    #[inline]
    pub fn first(&self) -> Option<&K> {
        self.map.first_key_value().map(|(k, _)| k)
    }

    /// Returns the largest key.
    #[inline]
    pub fn last(&self) -> Option<&K> {
        self.map.last_key_value().map(|(k, _)| k)
    }

    /// Returns the smallest key equal to or greater than the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::TreeSet;
    ///
    /// let treeset: TreeSet<u32> = [10, 20, 30].into_iter().collect();
    ///
    /// assert_eq!(treeset.ceiling(&15), Some(&20));
    /// assert_eq!(treeset.floor(&15), Some(&10));
    /// assert_eq!(treeset.higher(&30), None);
    /// assert_eq!(treeset.lower(&30), Some(&20));
    /// ```
    #[inline]
    pub fn ceiling(&self, key: &K) -> Option<&K> {
        self.map.ceiling(key).map(|(k, _)| k)
    }

    /// Returns the largest key equal to or less than the given key.
    #[inline]
    pub fn floor(&self, key: &K) -> Option<&K> {
        self.map.floor(key).map(|(k, _)| k)
    }

    /// Returns the smallest key strictly greater than the given key.
    #[inline]
    pub fn higher(&self, key: &K) -> Option<&K> {
        self.map.higher(key).map(|(k, _)| k)
    }

    /// Returns the largest key strictly less than the given key.
    #[inline]
    pub fn lower(&self, key: &K) -> Option<&K> {
        self.map.lower(key).map(|(k, _)| k)
    }

    /// Removes the smallest key.
    #[inline]
    pub fn pop_first(&mut self) -> Option<K> {
        self.map.pop_first().map(|(k, _)| k)
    }

    /// Removes the largest key.
    #[inline]
    pub fn pop_last(&mut self) -> Option<K> {
        self.map.pop_last().map(|(k, _)| k)
    }

    /// Returns a live view of the keys within the range.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::TreeSet;
    ///
    /// let mut treeset: TreeSet<u32> = (0..10).collect();
    ///
    /// assert_eq!(treeset.head_set(3).iter().copied().collect::<Vec<_>>(), [0, 1, 2]);
    /// assert_eq!(treeset.tail_set(8).len(), 2);
    /// assert_eq!(treeset.sub_set(4, 6).first(), Some(&4));
    ///
    /// let mut view = treeset.range_mut(20..);
    /// assert!(view.add(25).unwrap());
    /// assert!(view.add(5).is_err());
    /// assert_eq!(treeset.last(), Some(&25));
    /// ```
    #[inline]
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> RangeSet<'_, K, R> {
        RangeSet {
            view: self.map.range(range),
        }
    }

    /// Returns a live view of the keys within the range that can add and remove keys within the
    /// range.
    #[inline]
    pub fn range_mut<R: RangeBounds<K>>(&mut self, range: R) -> RangeSetMut<'_, K, R> {
        RangeSetMut {
            view: self.map.range_mut(range),
        }
    }

    /// Returns a live view of the keys strictly less than `to`.
    #[inline]
    pub fn head_set(&self, to: K) -> RangeSet<'_, K, RangeTo<K>> {
        self.range(..to)
    }

    /// Returns a live view of the keys equal to or greater than `from`.
    #[inline]
    pub fn tail_set(&self, from: K) -> RangeSet<'_, K, RangeFrom<K>> {
        self.range(from..)
    }

    /// Returns a live view of the keys in `[from, to)`.
    #[inline]
    pub fn sub_set(&self, from: K, to: K) -> RangeSet<'_, K, Range<K>> {
        self.range(from..to)
    }
}

impl<M> Clone for SetView<M>
where
    M: Clone,
{
    #[inline]
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<M> Debug for SetView<M>
where
    M: Map<Value = ()>,
    M::Key: Debug,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_set();
        if self.contains_null() {
            d.entry(&format_args!("<null>"));
        }
        d.entries(self.iter()).finish()
    }
}

impl<M> Default for SetView<M>
where
    M: Map<Value = ()> + Default,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Extend<M::Key> for SetView<M>
where
    M: Map<Value = ()>,
{
    /// Adds the keys; keys rejected by the underlying [`Map`] are skipped.
    #[inline]
    fn extend<T: IntoIterator<Item = M::Key>>(&mut self, iter: T) {
        iter.into_iter().for_each(|k| {
            let _result = self.add(k);
        });
    }
}

impl<M> FromIterator<M::Key> for SetView<M>
where
    M: Map<Value = ()> + Default,
{
    #[inline]
    fn from_iter<T: IntoIterator<Item = M::Key>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'s, M> IntoIterator for &'s SetView<M>
where
    M: Map<Value = ()>,
{
    type Item = &'s M::Key;
    type IntoIter = Iter<'s, M>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<M> PartialEq for SetView<M>
where
    M: PartialEq,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<'s, M> Iterator for Iter<'s, M>
where
    M: Map + 's,
{
    type Item = &'s M::Key;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<M> Cursor<M>
where
    M: Map<Value = ()>,
{
    /// Returns the next key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralChange`] if the set was structurally modified other than
    /// through this cursor.
    #[inline]
    pub fn next<'s>(&mut self, set: &'s SetView<M>) -> Result<Option<&'s M::Key>, Error> {
        Ok(set.map.cursor_next(&mut self.inner)?.map(|(k, _)| k))
    }

    /// Removes the key last returned by [`Cursor::next`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralChange`] as [`Cursor::next`] does, or
    /// [`Error::NoCurrentEntry`] if there is no key to remove.
    #[inline]
    pub fn remove(&mut self, set: &mut SetView<M>) -> Result<M::Key, Error> {
        set.map.cursor_remove(&mut self.inner).map(|(k, _)| k)
    }

    /// Returns the state of the cursor.
    #[inline]
    pub fn state(&self) -> CursorState {
        M::cursor_state(&self.inner)
    }
}

impl<M> Debug for Cursor<M>
where
    M: Map,
    M::Cursor: Debug,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.inner).finish()
    }
}

impl<'s, K, R> RangeSet<'s, K, R>
where
    K: PartialOrd,
    R: RangeBounds<K>,
{
    /// Returns `true` if the key lies within the range and is present.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.view.contains_key(key)
    }

    /// Returns the smallest key within the range.
    #[inline]
    pub fn first(&self) -> Option<&'s K> {
        self.view.first_key_value().map(|(k, _)| k)
    }

    /// Returns the largest key within the range.
    #[inline]
    pub fn last(&self) -> Option<&'s K> {
        self.view.last_key_value().map(|(k, _)| k)
    }

    /// Returns the number of keys within the range.
    #[inline]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Returns `true` if there is no key within the range.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Returns a double-ended iterator over the keys within the range in ascending order.
    #[inline]
    pub fn iter(&self) -> RangeSetIter<'s, K> {
        RangeSetIter {
            inner: self.view.iter(),
        }
    }
}

impl<K, R> RangeSetMut<'_, K, R>
where
    K: PartialOrd,
    R: RangeBounds<K>,
{
    /// Adds a key within the range, returning `true` if the key was not present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncomparableKey`] if the key cannot be ordered, or
    /// [`Error::KeyOutOfRange`] if the key lies outside the range.
    #[inline]
    pub fn add(&mut self, key: K) -> Result<bool, Error> {
        Ok(self.view.put(key, ())?.is_none())
    }

    /// Removes a key within the range, returning `true` if it was present.
    #[inline]
    pub fn remove(&mut self, key: &K) -> bool {
        self.view.remove(key).is_some()
    }

    /// Removes every key within the range.
    #[inline]
    pub fn clear(&mut self) {
        self.view.clear();
    }

    /// Returns `true` if the key lies within the range and is present.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.view.contains_key(key)
    }

    /// Returns the smallest key within the range.
    #[inline]
    pub fn first(&self) -> Option<&K> {
        self.view.first_key_value().map(|(k, _)| k)
    }

    /// Returns the largest key within the range.
    #[inline]
    pub fn last(&self) -> Option<&K> {
        self.view.last_key_value().map(|(k, _)| k)
    }

    /// Returns the number of keys within the range.
    #[inline]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Returns `true` if there is no key within the range.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Returns a double-ended iterator over the keys within the range in ascending order.
    #[inline]
    pub fn iter(&self) -> RangeSetIter<'_, K> {
        RangeSetIter {
            inner: self.view.iter(),
        }
    }
}

impl<'s, K> Iterator for RangeSetIter<'s, K> {
    type Item = &'s K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<K> DoubleEndedIterator for RangeSetIter<'_, K> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K> FusedIterator for RangeSetIter<'_, K> {}
