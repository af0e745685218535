use super::TreeMap;
use crate::rb_tree::{NodeId, RbTree};
use crate::Error;
use std::fmt::{self, Debug};
use std::iter::FusedIterator;
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::ops::RangeBounds;

/// A live view of the entries of a [`TreeMap`] within a range.
///
/// Every method evaluates the range against the current state of the [`TreeMap`].
pub struct RangeView<'t, K, V, R> {
    treemap: &'t TreeMap<K, V>,
    range: R,
}

/// A live view of the entries of a [`TreeMap`] within a range that can insert and remove
/// entries whose keys lie within the range.
pub struct RangeViewMut<'t, K, V, R> {
    treemap: &'t mut TreeMap<K, V>,
    range: R,
}

/// A double-ended iterator over the entries of a [`TreeMap`] within a range.
pub struct RangeIter<'t, K, V> {
    tree: &'t RbTree<K, V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<'t, K, V, R> RangeView<'t, K, V, R>
where
    K: PartialOrd,
    R: RangeBounds<K>,
{
    #[inline]
    pub(super) fn new(treemap: &'t TreeMap<K, V>, range: R) -> Self {
        Self { treemap, range }
    }

    /// Returns `true` if the key lies within the range.
    #[inline]
    pub fn in_range(&self, key: &K) -> bool {
        in_range(&self.range, key)
    }

    /// Returns `true` if the key lies within the range and is present.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.in_range(key) && self.treemap.contains_key(key)
    }

    /// Returns a reference to the value associated with the key if the key lies within the
    /// range.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&'t V> {
        if self.in_range(key) {
            self.treemap.get(key)
        } else {
            None
        }
    }

    /// Returns the entry with the smallest key within the range.
    #[inline]
    pub fn first_key_value(&self) -> Option<(&'t K, &'t V)> {
        let tree = &self.treemap.tree;
        lower_node(tree, &self.range).map(|id| tree.entry(id))
    }

    /// Returns the entry with the largest key within the range.
    #[inline]
    pub fn last_key_value(&self) -> Option<(&'t K, &'t V)> {
        let tree = &self.treemap.tree;
        upper_node(tree, &self.range).map(|id| tree.entry(id))
    }

    /// Returns the number of entries within the range.
    ///
    /// It iterates over the entries within the range.
    #[inline]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if there is no entry within the range.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first_key_value().is_none()
    }

    /// Returns a double-ended iterator over the entries within the range in ascending order.
    #[inline]
    pub fn iter(&self) -> RangeIter<'t, K, V> {
        RangeIter::new(&self.treemap.tree, &self.range)
    }
}

impl<K, V, R> Debug for RangeView<'_, K, V, R>
where
    K: Debug + PartialOrd,
    V: Debug,
    R: RangeBounds<K>,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'t, K, V, R> RangeViewMut<'t, K, V, R>
where
    K: PartialOrd,
    R: RangeBounds<K>,
{
    #[inline]
    pub(super) fn new(treemap: &'t mut TreeMap<K, V>, range: R) -> Self {
        Self { treemap, range }
    }

    /// Returns `true` if the key lies within the range.
    #[inline]
    pub fn in_range(&self, key: &K) -> bool {
        in_range(&self.range, key)
    }

    /// Inserts a key-value pair whose key lies within the range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncomparableKey`] if the key cannot be ordered, or
    /// [`Error::KeyOutOfRange`] if the key lies outside the range.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        if key.partial_cmp(&key).is_none() {
            return Err(Error::IncomparableKey);
        }
        if !self.in_range(&key) {
            return Err(Error::KeyOutOfRange);
        }
        self.treemap.put(key, value)
    }

    /// Removes the key if it lies within the range, returning its value.
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        if self.in_range(key) {
            self.treemap.remove(key)
        } else {
            None
        }
    }

    /// Removes every entry within the range.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::TreeMap;
    ///
    /// let mut treemap: TreeMap<u32, ()> = (0..10).map(|k| (k, ())).collect();
    ///
    /// treemap.range_mut(2..=7).clear();
    /// assert_eq!(treemap.keys().copied().collect::<Vec<_>>(), [0, 1, 8, 9]);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        while let Some(id) = lower_node(&self.treemap.tree, &self.range) {
            self.treemap.remove_node(id);
        }
    }

    /// Returns `true` if the key lies within the range and is present.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.in_range(key) && self.treemap.contains_key(key)
    }

    /// Returns a reference to the value associated with the key if the key lies within the
    /// range.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        if self.in_range(key) {
            self.treemap.get(key)
        } else {
            None
        }
    }

    /// Returns a mutable reference to the value associated with the key if the key lies within
    /// the range.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if self.in_range(key) {
            self.treemap.get_mut(key)
        } else {
            None
        }
    }

    /// Returns the entry with the smallest key within the range.
    #[inline]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let tree = &self.treemap.tree;
        lower_node(tree, &self.range).map(|id| tree.entry(id))
    }

    /// Returns the entry with the largest key within the range.
    #[inline]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let tree = &self.treemap.tree;
        upper_node(tree, &self.range).map(|id| tree.entry(id))
    }

    /// Removes the entry with the smallest key within the range.
    #[inline]
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let id = lower_node(&self.treemap.tree, &self.range)?;
        Some(self.treemap.remove_node(id))
    }

    /// Removes the entry with the largest key within the range.
    #[inline]
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let id = upper_node(&self.treemap.tree, &self.range)?;
        Some(self.treemap.remove_node(id))
    }

    /// Returns the number of entries within the range.
    #[inline]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if there is no entry within the range.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first_key_value().is_none()
    }

    /// Returns a double-ended iterator over the entries within the range in ascending order.
    #[inline]
    pub fn iter(&self) -> RangeIter<'_, K, V> {
        RangeIter::new(&self.treemap.tree, &self.range)
    }
}

impl<K, V, R> Debug for RangeViewMut<'_, K, V, R>
where
    K: Debug + PartialOrd,
    V: Debug,
    R: RangeBounds<K>,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'t, K, V> RangeIter<'t, K, V> {
    fn new<R>(tree: &'t RbTree<K, V>, range: &R) -> Self
    where
        K: PartialOrd,
        R: RangeBounds<K>,
    {
        match (lower_node(tree, range), upper_node(tree, range)) {
            (Some(front), Some(back)) => Self {
                tree,
                front: Some(front),
                back: Some(back),
            },
            _ => Self {
                tree,
                front: None,
                back: None,
            },
        }
    }
}

impl<'t, K, V> Iterator for RangeIter<'t, K, V> {
    type Item = (&'t K, &'t V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let id = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.tree.successor(id);
        }
        Some(self.tree.entry(id))
    }
}

impl<K, V> DoubleEndedIterator for RangeIter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = self.tree.predecessor(id);
        }
        Some(self.tree.entry(id))
    }
}

impl<K, V> FusedIterator for RangeIter<'_, K, V> {}

/// Returns `true` if the key lies within the range.
fn in_range<K: PartialOrd, R: RangeBounds<K>>(range: &R, key: &K) -> bool {
    above_start(range, key) && below_end(range, key)
}

fn above_start<K: PartialOrd, R: RangeBounds<K>>(range: &R, key: &K) -> bool {
    match range.start_bound() {
        Included(start) => key >= start,
        Excluded(start) => key > start,
        Unbounded => true,
    }
}

fn below_end<K: PartialOrd, R: RangeBounds<K>>(range: &R, key: &K) -> bool {
    match range.end_bound() {
        Included(end) => key <= end,
        Excluded(end) => key < end,
        Unbounded => true,
    }
}

/// Returns the node with the smallest key within the range.
fn lower_node<K: PartialOrd, V, R: RangeBounds<K>>(
    tree: &RbTree<K, V>,
    range: &R,
) -> Option<NodeId> {
    let candidate = match range.start_bound() {
        Included(start) => tree.ceiling_by(|k| start.partial_cmp(k).ok_or(()), true),
        Excluded(start) => tree.ceiling_by(|k| start.partial_cmp(k).ok_or(()), false),
        Unbounded => Ok(tree.first()),
    };
    candidate
        .ok()
        .flatten()
        .filter(|&id| below_end(range, tree.key(id)))
}

/// Returns the node with the largest key within the range.
fn upper_node<K: PartialOrd, V, R: RangeBounds<K>>(
    tree: &RbTree<K, V>,
    range: &R,
) -> Option<NodeId> {
    let candidate = match range.end_bound() {
        Included(end) => tree.floor_by(|k| end.partial_cmp(k).ok_or(()), true),
        Excluded(end) => tree.floor_by(|k| end.partial_cmp(k).ok_or(()), false),
        Unbounded => Ok(tree.last()),
    };
    candidate
        .ok()
        .flatten()
        .filter(|&id| above_start(range, tree.key(id)))
}
