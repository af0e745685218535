//! [`TreeMap`] is an ordered map backed by a red-black tree.

mod range;

pub use range::{RangeIter, RangeView, RangeViewMut};

use super::cursor::{Generation, Tracker};
use super::rb_tree::{self, NodeId, RbTree};
use super::{Comparable, CursorState, Error, Map};
use std::fmt::{self, Debug};
use std::iter::FusedIterator;
use std::ops::{Range, RangeBounds, RangeFrom, RangeTo};

/// Single-threaded ordered map.
///
/// Entries are kept in a red-black tree, therefore the height of the tree is at most
/// `2 * log2(len + 1)` and every lookup, insertion, and removal takes a logarithmic number of
/// comparisons. Keys are ordered by [`PartialOrd`]; a key that cannot be ordered, e.g.,
/// `f64::NAN`, is rejected with [`Error::IncomparableKey`] and the null key with
/// [`Error::NullKeyRejected`].
///
/// # Examples
///
/// ```
/// use assoc::TreeMap;
///
/// let mut treemap: TreeMap<&str, u32> = TreeMap::new();
/// assert!(treemap.put("banana", 2).unwrap().is_none());
/// assert!(treemap.put("apple", 1).unwrap().is_none());
/// assert!(treemap.put("cherry", 3).unwrap().is_none());
///
/// let keys: Vec<&str> = treemap.keys().copied().collect();
/// assert_eq!(keys, ["apple", "banana", "cherry"]);
/// assert_eq!(treemap.first_key_value(), Some((&"apple", &1)));
/// ```
pub struct TreeMap<K, V> {
    tree: RbTree<K, V>,
    generation: Generation,
}

/// Fail-fast cursor over the entries of a [`TreeMap`] in ascending order.
///
/// # Examples
///
/// ```
/// use assoc::TreeMap;
///
/// let mut treemap: TreeMap<u32, u32> = (0..10).map(|k| (k, k)).collect();
///
/// let mut cursor = treemap.cursor();
/// while let Some((k, _)) = cursor.next(&treemap).unwrap() {
///     if *k >= 5 {
///         assert!(cursor.remove(&mut treemap).is_ok());
///     }
/// }
/// assert_eq!(treemap.last_key_value(), Some((&4, &4)));
/// ```
#[derive(Clone, Debug)]
pub struct Cursor {
    tracker: Tracker,
    next: Option<NodeId>,
    last: Option<NodeId>,
}

/// A double-ended iterator over the entries of a [`TreeMap`] in ascending order.
pub struct Iter<'t, K, V> {
    inner: rb_tree::Iter<'t, K, V>,
}

/// A double-ended iterator over the keys of a [`TreeMap`] in ascending order.
pub struct Keys<'t, K, V> {
    inner: rb_tree::Iter<'t, K, V>,
}

/// A double-ended iterator over the values of a [`TreeMap`] in ascending key order.
pub struct Values<'t, K, V> {
    inner: rb_tree::Iter<'t, K, V>,
}

impl<K, V> TreeMap<K, V> {
    /// Creates an empty [`TreeMap`].
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::TreeMap;
    ///
    /// let treemap: TreeMap<u64, u32> = TreeMap::new();
    /// assert!(treemap.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: RbTree::new(),
            generation: Generation::new(),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the [`TreeMap`] is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::TreeMap;
    ///
    /// let treemap: TreeMap<u32, ()> = (0..1023).map(|k| (k, ())).collect();
    /// assert!(treemap.depth() <= 20);
    /// ```
    #[inline]
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Removes every entry.
    #[inline]
    pub fn clear(&mut self) {
        if !self.tree.is_empty() {
            self.tree.clear();
            self.generation.bump();
        }
    }

    /// Returns the entry with the smallest key.
    #[inline]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|id| self.tree.entry(id))
    }

    /// Returns the entry with the largest key.
    #[inline]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|id| self.tree.entry(id))
    }

    /// Removes the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::TreeMap;
    ///
    /// let mut treemap: TreeMap<u32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
    ///
    /// assert_eq!(treemap.pop_first(), Some((1, 'a')));
    /// assert_eq!(treemap.pop_first(), Some((2, 'b')));
    /// assert!(treemap.pop_first().is_none());
    /// ```
    #[inline]
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let id = self.tree.first()?;
        Some(self.remove_node(id))
    }

    /// Removes the entry with the largest key.
    #[inline]
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let id = self.tree.last()?;
        Some(self.remove_node(id))
    }

    /// Returns a double-ended iterator over the entries in ascending order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    /// Returns a double-ended iterator over the keys in ascending order.
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.tree.iter(),
        }
    }

    /// Returns a double-ended iterator over the values in ascending key order.
    #[inline]
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.tree.iter(),
        }
    }

    /// Creates a fail-fast [`Cursor`] positioned before the smallest key.
    #[inline]
    pub fn cursor(&self) -> Cursor {
        Cursor {
            tracker: Tracker::new(&self.generation),
            next: self.tree.first(),
            last: None,
        }
    }

    #[inline]
    fn remove_node(&mut self, id: NodeId) -> (K, V) {
        self.generation.bump();
        self.tree.remove(id)
    }

    /// Finds the node of the key; a key that cannot be ordered is never found.
    #[inline]
    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        Q: Comparable<K> + ?Sized,
    {
        self.tree.search(|k| key.compare(k).ok_or(())).ok().flatten()
    }

    #[inline]
    fn ceiling_node<Q>(&self, key: &Q, inclusive: bool) -> Option<NodeId>
    where
        Q: Comparable<K> + ?Sized,
    {
        self.tree
            .ceiling_by(|k| key.compare(k).ok_or(()), inclusive)
            .ok()
            .flatten()
    }

    #[inline]
    fn floor_node<Q>(&self, key: &Q, inclusive: bool) -> Option<NodeId>
    where
        Q: Comparable<K> + ?Sized,
    {
        self.tree
            .floor_by(|k| key.compare(k).ok_or(()), inclusive)
            .ok()
            .flatten()
    }
}

impl<K, V> TreeMap<K, V>
where
    K: PartialOrd,
{
    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// The existing key is retained if the key was present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncomparableKey`] if the key cannot be ordered against itself or a key
    /// in the [`TreeMap`].
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::{Error, TreeMap};
    ///
    /// let mut treemap: TreeMap<f64, u32> = TreeMap::new();
    ///
    /// assert_eq!(treemap.put(1.0, 0), Ok(None));
    /// assert_eq!(treemap.put(1.0, 1), Ok(Some(0)));
    /// assert_eq!(treemap.put(f64::NAN, 2), Err(Error::IncomparableKey));
    /// assert_eq!(treemap.len(), 1);
    /// ```
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        if key.partial_cmp(&key).is_none() {
            return Err(Error::IncomparableKey);
        }
        let (_, old) = self.tree.insert_by(key, value, |new, existing| {
            new.partial_cmp(existing).ok_or(Error::IncomparableKey)
        })?;
        if old.is_none() {
            self.generation.bump();
        }
        Ok(old)
    }

    /// Returns a reference to the value associated with the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::TreeMap;
    ///
    /// let mut treemap: TreeMap<String, u32> = TreeMap::new();
    ///
    /// treemap.put("one".to_string(), 1).unwrap();
    /// assert_eq!(treemap.get("one"), Some(&1));
    /// assert!(treemap.get("two").is_none());
    /// ```
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Comparable<K> + ?Sized,
    {
        self.find(key).map(|id| self.tree.value(id))
    }

    /// Returns the stored key and a reference to the value associated with the key.
    #[inline]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: Comparable<K> + ?Sized,
    {
        self.find(key).map(|id| self.tree.entry(id))
    }

    /// Returns a mutable reference to the value associated with the key.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Comparable<K> + ?Sized,
    {
        let id = self.find(key)?;
        Some(self.tree.value_mut(id))
    }

    /// Returns `true` if the key is present.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Comparable<K> + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Removes the key, returning its value.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::TreeMap;
    ///
    /// let mut treemap: TreeMap<u32, u32> = TreeMap::new();
    ///
    /// treemap.put(1, 10).unwrap();
    /// assert_eq!(treemap.remove(&1), Some(10));
    /// assert!(treemap.remove(&1).is_none());
    /// ```
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: Comparable<K> + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes the key, returning the stored key and its value.
    #[inline]
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: Comparable<K> + ?Sized,
    {
        let id = self.find(key)?;
        Some(self.remove_node(id))
    }

    /// Returns the entry with the smallest key equal to or greater than the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::TreeMap;
    ///
    /// let treemap: TreeMap<u32, ()> = [(10, ()), (20, ())].into_iter().collect();
    ///
    /// assert_eq!(treemap.ceiling(&10).map(|(k, _)| *k), Some(10));
    /// assert_eq!(treemap.higher(&10).map(|(k, _)| *k), Some(20));
    /// assert_eq!(treemap.floor(&15).map(|(k, _)| *k), Some(10));
    /// assert!(treemap.lower(&10).is_none());
    /// ```
    #[inline]
    pub fn ceiling<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: Comparable<K> + ?Sized,
    {
        self.ceiling_node(key, true).map(|id| self.tree.entry(id))
    }

    /// Returns the entry with the largest key equal to or less than the given key.
    #[inline]
    pub fn floor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: Comparable<K> + ?Sized,
    {
        self.floor_node(key, true).map(|id| self.tree.entry(id))
    }

    /// Returns the entry with the smallest key strictly greater than the given key.
    #[inline]
    pub fn higher<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: Comparable<K> + ?Sized,
    {
        self.ceiling_node(key, false).map(|id| self.tree.entry(id))
    }

    /// Returns the entry with the largest key strictly less than the given key.
    #[inline]
    pub fn lower<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: Comparable<K> + ?Sized,
    {
        self.floor_node(key, false).map(|id| self.tree.entry(id))
    }

    /// Returns a live view of the entries within the range.
    ///
    /// The view reflects the [`TreeMap`] at the time each of its methods is called.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::TreeMap;
    ///
    /// let treemap: TreeMap<u32, u32> = (0..10).map(|k| (k, k * 10)).collect();
    ///
    /// let view = treemap.range(3..6);
    /// assert_eq!(view.len(), 3);
    /// assert!(view.contains_key(&5));
    /// assert!(!view.contains_key(&6));
    /// assert_eq!(view.iter().map(|(k, _)| *k).collect::<Vec<_>>(), [3, 4, 5]);
    /// ```
    #[inline]
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> RangeView<'_, K, V, R> {
        RangeView::new(self, range)
    }

    /// Returns a live view of the entries within the range that accepts insertions and removals
    /// of keys within the range.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::{Error, TreeMap};
    ///
    /// let mut treemap: TreeMap<u32, u32> = TreeMap::new();
    ///
    /// let mut view = treemap.range_mut(10..20);
    /// assert_eq!(view.put(15, 0), Ok(None));
    /// assert_eq!(view.put(25, 0), Err(Error::KeyOutOfRange));
    /// assert!(treemap.contains_key(&15));
    /// ```
    #[inline]
    pub fn range_mut<R: RangeBounds<K>>(&mut self, range: R) -> RangeViewMut<'_, K, V, R> {
        RangeViewMut::new(self, range)
    }

    /// Returns a live view of the entries with keys strictly less than `to`.
    #[inline]
    pub fn head_map(&self, to: K) -> RangeView<'_, K, V, RangeTo<K>> {
        self.range(..to)
    }

    /// Returns a live view of the entries with keys equal to or greater than `from`.
    #[inline]
    pub fn tail_map(&self, from: K) -> RangeView<'_, K, V, RangeFrom<K>> {
        self.range(from..)
    }

    /// Returns a live view of the entries with keys in `[from, to)`.
    #[inline]
    pub fn sub_map(&self, from: K, to: K) -> RangeView<'_, K, V, Range<K>> {
        self.range(from..to)
    }
}

impl<K, V> Clone for TreeMap<K, V>
where
    K: Clone,
    V: Clone,
{
    #[inline]
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            generation: Generation::new(),
        }
    }
}

impl<K, V> Debug for TreeMap<K, V>
where
    K: Debug,
    V: Debug,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for TreeMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for TreeMap<K, V>
where
    K: PartialOrd,
{
    /// Inserts the entries; keys that cannot be ordered are skipped.
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        iter.into_iter().for_each(|(k, v)| {
            let _result = self.put(k, v);
        });
    }
}

impl<K, V> FromIterator<(K, V)> for TreeMap<K, V>
where
    K: PartialOrd,
{
    #[inline]
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut treemap = Self::new();
        treemap.extend(iter);
        treemap
    }
}

impl<'t, K, V> IntoIterator for &'t TreeMap<K, V> {
    type Item = (&'t K, &'t V);
    type IntoIter = Iter<'t, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> PartialEq for TreeMap<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V> Map for TreeMap<K, V>
where
    K: PartialOrd,
{
    type Key = K;
    type Value = V;
    type Iter<'m> = Iter<'m, K, V> where Self: 'm;
    type Cursor = Cursor;

    #[inline]
    fn put(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        TreeMap::put(self, key, value)
    }

    #[inline]
    fn put_null(&mut self, _value: V) -> Result<Option<V>, Error> {
        Err(Error::NullKeyRejected)
    }

    #[inline]
    fn get(&self, key: &K) -> Option<&V> {
        TreeMap::get(self, key)
    }

    #[inline]
    fn get_null(&self) -> Option<&V> {
        None
    }

    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        TreeMap::remove(self, key)
    }

    #[inline]
    fn remove_null(&mut self) -> Option<V> {
        None
    }

    #[inline]
    fn contains_key(&self, key: &K) -> bool {
        TreeMap::contains_key(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        TreeMap::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        TreeMap::clear(self);
    }

    #[inline]
    fn iter(&self) -> Self::Iter<'_> {
        TreeMap::iter(self)
    }

    #[inline]
    fn cursor(&self) -> Cursor {
        TreeMap::cursor(self)
    }

    #[inline]
    fn cursor_next<'m>(&'m self, cursor: &mut Cursor) -> Result<Option<(&'m K, &'m V)>, Error> {
        cursor.next(self)
    }

    #[inline]
    fn cursor_remove(&mut self, cursor: &mut Cursor) -> Result<(K, V), Error> {
        cursor.remove(self)
    }

    #[inline]
    fn cursor_state(cursor: &Cursor) -> CursorState {
        cursor.state()
    }
}

impl Cursor {
    /// Returns the entry with the next larger key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralChange`] if the [`TreeMap`] was structurally modified other
    /// than through this cursor, or if it is not the [`TreeMap`] that created the cursor.
    #[inline]
    pub fn next<'t, K, V>(
        &mut self,
        treemap: &'t TreeMap<K, V>,
    ) -> Result<Option<(&'t K, &'t V)>, Error> {
        self.tracker.check(&treemap.generation)?;
        if let Some(id) = self.next {
            self.last = Some(id);
            self.next = treemap.tree.successor(id);
            self.tracker.yielded();
            Ok(Some(treemap.tree.entry(id)))
        } else {
            self.last = None;
            self.tracker.exhausted();
            Ok(None)
        }
    }

    /// Removes the entry last returned by [`Cursor::next`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralChange`] as [`Cursor::next`] does, or
    /// [`Error::NoCurrentEntry`] if there is no entry to remove.
    #[inline]
    pub fn remove<K, V>(&mut self, treemap: &mut TreeMap<K, V>) -> Result<(K, V), Error> {
        self.tracker.check_removable(&treemap.generation)?;
        let id = self.last.take().ok_or(Error::NoCurrentEntry)?;
        if treemap.tree.has_two_children(id) {
            // The successor entry is moved into the slot of the removed node.
            self.next = Some(id);
        }
        let entry = treemap.remove_node(id);
        self.tracker.removed(&treemap.generation);
        Ok(entry)
    }

    /// Returns the state of the cursor.
    #[inline]
    pub fn state(&self) -> CursorState {
        self.tracker.state()
    }
}

impl<'t, K, V> Iterator for Iter<'t, K, V> {
    type Item = (&'t K, &'t V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'t, K, V> Iterator for Keys<'t, K, V> {
    type Item = &'t K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<'t, K, V> Iterator for Values<'t, K, V> {
    type Item = &'t V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

#[cfg(all(test, not(feature = "loom")))]
impl<K, V> TreeMap<K, V> {
    pub(crate) fn check_invariants(&self) {
        self.tree.check_invariants();
    }
}
