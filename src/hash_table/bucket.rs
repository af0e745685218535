use crate::equivalent::Equivalent;
use crate::rb_tree::{self, NodeId, RbTree};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::mem::take;
use std::slice;

/// Position of an entry in a treeified bucket: the spread hash, then the insertion sequence
/// number of the entry.
pub(crate) type TreeKey = (u64, u64);

/// Node of a treeified bucket cached together with its position in iteration order.
pub(crate) type NodeHint = Option<(usize, NodeId)>;

/// [`Entry`] is a key-value pair with its spread hash and insertion sequence number.
#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) hash: u64,
    pub(crate) seq: u64,
    pub(crate) key: K,
    pub(crate) value: V,
}

/// [`Bucket`] holds the entries that are mapped to the same index.
///
/// A bucket starts as a chain and is converted into a red-black tree when the chain grows too
/// long; the tree is ordered by `(hash, sequence number)` which is total for any key type.
#[derive(Clone, Debug)]
pub(crate) enum Bucket<K, V> {
    Chain(Vec<Entry<K, V>>),
    Tree(RbTree<TreeKey, (K, V)>),
}

impl<K, V> Bucket<K, V> {
    /// Builds a bucket from entries sorted by `(hash, seq)` or in chain order.
    ///
    /// A tree is built if `as_tree` is set and there are at least `min_tree_len` entries.
    pub(crate) fn from_entries(entries: Vec<Entry<K, V>>, as_tree: bool, min_tree_len: usize) -> Self {
        if as_tree && entries.len() >= min_tree_len {
            let mut bucket = Bucket::Chain(entries);
            bucket.treeify();
            bucket
        } else {
            Bucket::Chain(entries)
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Bucket::Chain(chain) => chain.len(),
            Bucket::Tree(tree) => tree.len(),
        }
    }

    #[inline]
    pub(crate) fn is_tree(&self) -> bool {
        matches!(self, Bucket::Tree(_))
    }

    /// Finds the entry associated with the key.
    pub(crate) fn find<Q>(&self, hash: u64, key: &Q) -> Option<(&K, &V)>
    where
        Q: Equivalent<K> + ?Sized,
    {
        match self {
            Bucket::Chain(chain) => chain
                .iter()
                .find(|e| e.hash == hash && key.equivalent(&e.key))
                .map(|e| (&e.key, &e.value)),
            Bucket::Tree(tree) => Self::tree_find(tree, hash, key).map(|id| {
                let (k, v) = tree.value(id);
                (k, v)
            }),
        }
    }

    /// Finds the entry associated with the key for modification.
    pub(crate) fn find_mut<Q>(&mut self, hash: u64, key: &Q) -> Option<(&K, &mut V)>
    where
        Q: Equivalent<K> + ?Sized,
    {
        match self {
            Bucket::Chain(chain) => chain
                .iter_mut()
                .find(|e| e.hash == hash && key.equivalent(&e.key))
                .map(|e| (&e.key, &mut e.value)),
            Bucket::Tree(tree) => Self::tree_find(tree, hash, key).map(|id| {
                let (k, v) = tree.value_mut(id);
                (&*k, v)
            }),
        }
    }

    /// Appends an entry whose key is not in the bucket.
    pub(crate) fn push(&mut self, entry: Entry<K, V>) {
        match self {
            Bucket::Chain(chain) => chain.push(entry),
            Bucket::Tree(tree) => {
                infallible(tree.insert_by(
                    (entry.hash, entry.seq),
                    (entry.key, entry.value),
                    total_order,
                ));
            }
        }
    }

    /// Removes the entry associated with the key.
    pub(crate) fn remove<Q>(&mut self, hash: u64, key: &Q) -> Option<Entry<K, V>>
    where
        Q: Equivalent<K> + ?Sized,
    {
        match self {
            Bucket::Chain(chain) => {
                let pos = chain
                    .iter()
                    .position(|e| e.hash == hash && key.equivalent(&e.key))?;
                Some(chain.remove(pos))
            }
            Bucket::Tree(tree) => {
                let id = Self::tree_find(tree, hash, key)?;
                Some(Self::tree_remove(tree, id))
            }
        }
    }

    /// Returns the entry at the position in iteration order.
    ///
    /// In a tree, `hint` caches the node of a nearby position so that stepping forward one
    /// position at a time visits the successor instead of counting from the first node.
    pub(crate) fn entry_at(&self, ordinal: usize, hint: &mut NodeHint) -> Option<(&K, &V)> {
        match self {
            Bucket::Chain(chain) => {
                *hint = None;
                chain.get(ordinal).map(|e| (&e.key, &e.value))
            }
            Bucket::Tree(tree) => {
                *hint = Self::locate(tree, ordinal, *hint).map(|id| (ordinal, id));
                hint.map(|(_, id)| {
                    let (k, v) = tree.value(id);
                    (k, v)
                })
            }
        }
    }

    /// Removes the entry at the position in iteration order.
    ///
    /// Entries after the removed one shift down by one position, and `hint` is left pointing
    /// at the entry that takes over the position.
    pub(crate) fn remove_at(&mut self, ordinal: usize, hint: &mut NodeHint) -> Option<Entry<K, V>> {
        match self {
            Bucket::Chain(chain) => {
                *hint = None;
                (ordinal < chain.len()).then(|| chain.remove(ordinal))
            }
            Bucket::Tree(tree) => {
                let Some(id) = Self::locate(tree, ordinal, *hint) else {
                    *hint = None;
                    return None;
                };
                let next = if tree.has_two_children(id) {
                    // The successor entry is moved into the slot of the removed node.
                    Some(id)
                } else {
                    tree.successor(id)
                };
                let entry = Self::tree_remove(tree, id);
                *hint = next.map(|id| (ordinal, id));
                Some(entry)
            }
        }
    }

    /// Converts a chain into a tree.
    pub(crate) fn treeify(&mut self) {
        if let Bucket::Chain(chain) = self {
            let mut tree = RbTree::new();
            for entry in take(chain) {
                infallible(tree.insert_by(
                    (entry.hash, entry.seq),
                    (entry.key, entry.value),
                    total_order,
                ));
            }
            *self = Bucket::Tree(tree);
        }
    }

    /// Converts a tree into a chain preserving the iteration order.
    pub(crate) fn untreeify(&mut self) {
        if let Bucket::Tree(tree) = self {
            let entries = Self::tree_entries(take(tree));
            *self = Bucket::Chain(entries);
        }
    }

    /// Consumes the bucket and returns its entries in iteration order.
    pub(crate) fn into_entries(self) -> Vec<Entry<K, V>> {
        match self {
            Bucket::Chain(chain) => chain,
            Bucket::Tree(tree) => Self::tree_entries(tree),
        }
    }

    /// Returns an iterator over the entries.
    #[inline]
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        match self {
            Bucket::Chain(chain) => Iter::Chain(chain.iter()),
            Bucket::Tree(tree) => Iter::Tree(tree.iter()),
        }
    }

    /// Finds the first node of the hash in the tree, then scans equal hashes.
    fn tree_find<Q>(tree: &RbTree<TreeKey, (K, V)>, hash: u64, key: &Q) -> Option<NodeId>
    where
        Q: Equivalent<K> + ?Sized,
    {
        let mut current = infallible(tree.ceiling_by(|k| Ok((hash, 0).cmp(k)), true));
        while let Some(id) = current {
            if tree.key(id).0 != hash {
                return None;
            }
            if key.equivalent(&tree.value(id).0) {
                return Some(id);
            }
            current = tree.successor(id);
        }
        None
    }

    fn locate(tree: &RbTree<TreeKey, (K, V)>, ordinal: usize, hint: NodeHint) -> Option<NodeId> {
        match hint {
            Some((at, id)) if at == ordinal => Some(id),
            Some((at, id)) if at + 1 == ordinal => tree.successor(id),
            _ => tree.nth(ordinal),
        }
    }

    fn tree_remove(tree: &mut RbTree<TreeKey, (K, V)>, id: NodeId) -> Entry<K, V> {
        let ((hash, seq), (key, value)) = tree.remove(id);
        Entry {
            hash,
            seq,
            key,
            value,
        }
    }

    fn tree_entries(tree: RbTree<TreeKey, (K, V)>) -> Vec<Entry<K, V>> {
        tree.into_sorted_vec()
            .into_iter()
            .map(|((hash, seq), (key, value))| Entry {
                hash,
                seq,
                key,
                value,
            })
            .collect()
    }
}

impl<K, V> Default for Bucket<K, V> {
    #[inline]
    fn default() -> Self {
        Bucket::Chain(Vec::new())
    }
}

/// Iterator over the entries of a [`Bucket`].
pub(crate) enum Iter<'b, K, V> {
    Chain(slice::Iter<'b, Entry<K, V>>),
    Tree(rb_tree::Iter<'b, TreeKey, (K, V)>),
}

impl<K, V> Default for Iter<'_, K, V> {
    #[inline]
    fn default() -> Self {
        Iter::Chain([].iter())
    }
}

impl<'b, K, V> Iterator for Iter<'b, K, V> {
    type Item = (&'b K, &'b V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Iter::Chain(iter) => iter.next().map(|e| (&e.key, &e.value)),
            Iter::Tree(iter) => iter.next().map(|(_, (k, v))| (k, v)),
        }
    }
}

#[inline]
#[allow(clippy::unnecessary_wraps)]
fn total_order(new: &TreeKey, existing: &TreeKey) -> Result<Ordering, Infallible> {
    Ok(new.cmp(existing))
}

/// Unwraps a result that cannot fail.
#[inline]
fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(hash: u64, seq: u64) -> Entry<u64, u64> {
        Entry {
            hash,
            seq,
            key: seq,
            value: seq * 10,
        }
    }

    #[test]
    fn treeify_preserves_lookup() {
        let mut bucket = Bucket::default();
        for seq in 0..12 {
            bucket.push(entry(seq % 3, seq));
        }
        bucket.treeify();
        assert!(bucket.is_tree());
        assert_eq!(bucket.len(), 12);
        for seq in 0..12 {
            assert_eq!(bucket.find(seq % 3, &seq), Some((&seq, &(seq * 10))));
            assert!(bucket.find(seq % 3 + 1, &seq).is_none());
        }
        if let Bucket::Tree(tree) = &bucket {
            tree.check_invariants();
        }
    }

    #[test]
    fn tree_iteration_order_survives_untreeify() {
        let mut bucket = Bucket::default();
        for seq in 0..10 {
            bucket.push(entry(7 - seq % 2, seq));
        }
        bucket.treeify();
        let before: Vec<u64> = bucket.iter().map(|(k, _)| *k).collect();
        assert_eq!(before, vec![1, 3, 5, 7, 9, 0, 2, 4, 6, 8]);
        bucket.untreeify();
        assert!(!bucket.is_tree());
        let after: Vec<u64> = bucket.iter().map(|(k, _)| *k).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn remove_at_shifts() {
        let mut bucket = Bucket::default();
        for seq in 0..9 {
            bucket.push(entry(1, seq));
        }
        bucket.treeify();
        let mut hint = None;
        assert_eq!(bucket.remove_at(4, &mut hint).map(|e| e.key), Some(4));
        assert_eq!(bucket.entry_at(4, &mut hint), Some((&5, &50)));
        assert!(bucket.remove_at(8, &mut None).is_none());
        assert_eq!(bucket.remove(1, &8).map(|e| e.value), Some(80));
        assert_eq!(bucket.len(), 7);
    }

    #[test]
    fn stepping_through_tree() {
        let mut bucket = Bucket::default();
        for seq in 0..64 {
            bucket.push(entry(seq % 5, seq));
        }
        bucket.treeify();
        let expected: Vec<u64> = bucket.iter().map(|(k, _)| *k).collect();

        let mut hint = None;
        let mut ordinal = 0;
        let mut kept = Vec::new();
        while let Some((k, _)) = bucket.entry_at(ordinal, &mut hint) {
            let k = *k;
            assert_eq!(hint.map(|(at, _)| at), Some(ordinal));
            if k % 3 == 0 {
                assert_eq!(bucket.remove_at(ordinal, &mut hint).map(|e| e.key), Some(k));
            } else {
                kept.push(k);
                ordinal += 1;
            }
        }
        assert!(hint.is_none());

        let remaining: Vec<u64> = expected.into_iter().filter(|k| k % 3 != 0).collect();
        assert_eq!(kept, remaining);
        assert_eq!(bucket.iter().map(|(k, _)| *k).collect::<Vec<_>>(), remaining);
        if let Bucket::Tree(tree) = &bucket {
            tree.check_invariants();
        }
    }
}
