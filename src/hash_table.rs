//! [`HashTable`] is the bucket array shared by [`HashMap`](crate::HashMap) and the segments of
//! [`StripedMap`](crate::StripedMap).
//!
//! The table does not hash keys by itself: every operation receives the hash value computed by
//! the owning container, which lets [`StripedMap`](crate::StripedMap) consume the low bits for
//! segment selection before handing the hash down.

pub mod bucket;

use crate::equivalent::Equivalent;
use crate::Config;
use bucket::{Bucket, Entry, NodeHint};
use std::hash::{BuildHasher, Hash, Hasher};
use std::iter::FusedIterator;
use std::mem::{replace, take};
use std::slice;

/// The largest number of buckets.
pub(crate) const MAX_CAPACITY: usize = 1_usize << (usize::BITS - 1);

/// Returns the hash value of the key.
#[inline]
pub(crate) fn hash<Q, H>(build_hasher: &H, key: &Q) -> u64
where
    Q: Hash + ?Sized,
    H: BuildHasher,
{
    let mut h = build_hasher.build_hasher();
    key.hash(&mut h);
    h.finish()
}

/// Folds the high bits of the hash value into the low bits used for bucket indexing.
#[inline]
pub(crate) const fn spread(hash: u64) -> u64 {
    let h = hash ^ (hash >> 32);
    h ^ (h >> 16)
}

/// Returns the number of buckets for the requested capacity.
#[inline]
pub(crate) fn capacity_for(requested: usize) -> usize {
    requested
        .max(1)
        .checked_next_power_of_two()
        .map_or(MAX_CAPACITY, |c| c.min(MAX_CAPACITY))
}

/// Separately chained hash table with treeified buckets.
#[derive(Clone, Debug)]
pub(crate) struct HashTable<K, V> {
    buckets: Vec<Bucket<K, V>>,
    len: usize,
    threshold: usize,
    next_seq: u64,
    config: Config,
}

impl<K, V> HashTable<K, V> {
    /// Creates an empty [`HashTable`].
    ///
    /// The configuration is expected to have been validated.
    pub(crate) fn new(config: Config) -> Self {
        let capacity = capacity_for(config.initial_capacity());
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, Bucket::default);
        Self {
            buckets,
            len: 0,
            threshold: Self::threshold_of(capacity, config.load_factor()),
            next_seq: 0,
            config,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub(crate) fn bucket(&self, index: usize) -> Option<&Bucket<K, V>> {
        self.buckets.get(index)
    }

    /// Returns the key-value pair associated with the key.
    #[inline]
    pub(crate) fn get<Q>(&self, hash: u64, key: &Q) -> Option<(&K, &V)>
    where
        Q: Equivalent<K> + ?Sized,
    {
        let h = spread(hash);
        self.buckets[self.index(h)].find(h, key)
    }

    /// Returns the key and a mutable reference to the value associated with the key.
    #[inline]
    pub(crate) fn get_mut<Q>(&mut self, hash: u64, key: &Q) -> Option<(&K, &mut V)>
    where
        Q: Equivalent<K> + ?Sized,
    {
        let h = spread(hash);
        let index = self.index(h);
        self.buckets[index].find_mut(h, key)
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// Replacing the value of an existing key keeps the existing key.
    pub(crate) fn insert(&mut self, hash: u64, key: K, value: V) -> Option<V>
    where
        K: Eq,
    {
        let h = spread(hash);
        let index = self.index(h);
        if let Some((_, v)) = self.buckets[index].find_mut(h, &key) {
            return Some(replace(v, value));
        }
        self.push_new(index, h, key, value);
        None
    }

    /// Inserts a key-value pair if the key is absent, otherwise gives the pair back.
    pub(crate) fn try_insert(&mut self, hash: u64, key: K, value: V) -> Result<(), (K, V)>
    where
        K: Eq,
    {
        let h = spread(hash);
        let index = self.index(h);
        if self.buckets[index].find(h, &key).is_some() {
            return Err((key, value));
        }
        self.push_new(index, h, key, value);
        Ok(())
    }

    /// Removes the key-value pair associated with the key.
    pub(crate) fn remove<Q>(&mut self, hash: u64, key: &Q) -> Option<(K, V)>
    where
        Q: Equivalent<K> + ?Sized,
    {
        let h = spread(hash);
        let index = self.index(h);
        let entry = self.buckets[index].remove(h, key)?;
        self.after_removal(index);
        Some((entry.key, entry.value))
    }

    /// Removes the entry at the position in the iteration order of the bucket.
    pub(crate) fn remove_at(
        &mut self,
        index: usize,
        ordinal: usize,
        hint: &mut NodeHint,
    ) -> Option<(K, V)> {
        let entry = self.buckets.get_mut(index)?.remove_at(ordinal, hint)?;
        self.after_removal(index);
        if !self.buckets[index].is_tree() {
            *hint = None;
        }
        Some((entry.key, entry.value))
    }

    /// Retains the entries satisfying the predicate, and returns the number of removed entries.
    pub(crate) fn retain<F: FnMut(&K, &mut V) -> bool>(&mut self, mut pred: F) -> usize {
        let min_tree_len = self.config.untreeify_threshold();
        let mut removed = 0;
        for bucket in &mut self.buckets {
            if bucket.len() == 0 {
                continue;
            }
            let was_tree = bucket.is_tree();
            let mut entries = take(bucket).into_entries();
            let before = entries.len();
            entries.retain_mut(|e| pred(&e.key, &mut e.value));
            removed += before - entries.len();
            *bucket = Bucket::from_entries(entries, was_tree, min_tree_len);
        }
        self.len -= removed;
        removed
    }

    /// Removes every entry; the number of buckets is retained.
    pub(crate) fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = Bucket::default());
        self.len = 0;
    }

    /// Returns an iterator over the entries in bucket order.
    #[inline]
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: bucket::Iter::default(),
            remaining: self.len,
        }
    }

    #[inline]
    fn index(&self, spread_hash: u64) -> usize {
        #[allow(clippy::cast_possible_truncation)]
        let h = spread_hash as usize;
        h & (self.buckets.len() - 1)
    }

    fn push_new(&mut self, index: usize, hash: u64, key: K, value: V) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let may_treeify = self.buckets.len() >= self.config.min_treeify_capacity();
        let bucket = &mut self.buckets[index];
        bucket.push(Entry {
            hash,
            seq,
            key,
            value,
        });
        if may_treeify && !bucket.is_tree() && bucket.len() > self.config.treeify_threshold() {
            bucket.treeify();
        }
        self.len += 1;
        while self.len > self.threshold {
            self.resize();
        }
    }

    fn after_removal(&mut self, index: usize) {
        self.len -= 1;
        let bucket = &mut self.buckets[index];
        if bucket.is_tree() && bucket.len() < self.config.untreeify_threshold() {
            bucket.untreeify();
        }
    }

    /// Doubles the number of buckets.
    ///
    /// Every entry of bucket `i` moves either to `i` or to `i + old_capacity`, keeping the
    /// relative order within each half.
    fn resize(&mut self) {
        let old_capacity = self.buckets.len();
        if old_capacity >= MAX_CAPACITY {
            self.threshold = usize::MAX;
            return;
        }
        let new_capacity = old_capacity * 2;
        let min_tree_len = self.config.untreeify_threshold();
        let mut new_buckets: Vec<Bucket<K, V>> = Vec::with_capacity(new_capacity);
        new_buckets.resize_with(new_capacity, Bucket::default);
        let split_bit = old_capacity as u64;
        for (index, bucket) in take(&mut self.buckets).into_iter().enumerate() {
            if bucket.len() == 0 {
                continue;
            }
            let was_tree = bucket.is_tree();
            let (low, high): (Vec<_>, Vec<_>) = bucket
                .into_entries()
                .into_iter()
                .partition(|e| e.hash & split_bit == 0);
            new_buckets[index] = Bucket::from_entries(low, was_tree, min_tree_len);
            new_buckets[index + old_capacity] = Bucket::from_entries(high, was_tree, min_tree_len);
        }
        self.buckets = new_buckets;
        self.threshold = Self::threshold_of(new_capacity, self.config.load_factor());
    }

    fn threshold_of(capacity: usize, load_factor: f32) -> usize {
        if capacity >= MAX_CAPACITY {
            return usize::MAX;
        }
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let threshold = (capacity as f64 * f64::from(load_factor)) as usize;
        threshold
    }
}

/// Iterator over the entries of a [`HashTable`] in bucket order.
pub(crate) struct Iter<'t, K, V> {
    buckets: slice::Iter<'t, Bucket<K, V>>,
    current: bucket::Iter<'t, K, V>,
    remaining: usize,
}

impl<'t, K, V> Iterator for Iter<'t, K, V> {
    type Item = (&'t K, &'t V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                self.remaining -= 1;
                return Some(entry);
            }
            self.current = self.buckets.next()?.iter();
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
impl<K, V> HashTable<K, V> {
    /// Checks bucket placement, tree shape, and the entry count.
    pub(crate) fn check_invariants(&self) {
        let mut count = 0;
        for (index, bucket) in self.buckets.iter().enumerate() {
            if let Bucket::Tree(tree) = bucket {
                tree.check_invariants();
                assert!(self.capacity() >= self.config.min_treeify_capacity());
            }
            for entry in bucket_hashes(bucket) {
                assert_eq!(self.index(entry), index);
                count += 1;
            }
        }
        assert_eq!(count, self.len);
    }
}

#[cfg(test)]
fn bucket_hashes<K, V>(bucket: &Bucket<K, V>) -> Vec<u64> {
    match bucket {
        Bucket::Chain(chain) => chain.iter().map(|e| e.hash).collect(),
        Bucket::Tree(tree) => tree.iter().map(|((hash, _), _)| *hash).collect(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn table(initial_capacity: usize) -> HashTable<u64, u64> {
        HashTable::new(Config::default().with_initial_capacity(initial_capacity))
    }

    #[test]
    fn capacity_rounding() {
        assert_eq!(capacity_for(0), 1);
        assert_eq!(capacity_for(1), 1);
        assert_eq!(capacity_for(17), 32);
        assert_eq!(capacity_for(usize::MAX), MAX_CAPACITY);
        assert_eq!(spread(0x1234), 0x1234);
    }

    #[test]
    fn resize_once_past_threshold() {
        let mut table = table(16);
        for key in 1..=12 {
            assert!(table.insert(key, key, key).is_none());
            assert_eq!(table.capacity(), 16);
        }
        assert!(table.insert(13, 13, 13).is_none());
        assert_eq!(table.capacity(), 32);
        for key in 14..=20 {
            table.insert(key, key, key);
        }
        assert_eq!(table.capacity(), 32);
        for key in 1..=20 {
            assert_eq!(table.get(key, &key), Some((&key, &key)));
        }
        table.check_invariants();
    }

    #[test]
    fn small_load_factor_keeps_capacity_ahead() {
        let load_factor = 0.1_f32;
        let mut table: HashTable<u64, u64> = HashTable::new(
            Config::default()
                .with_initial_capacity(1)
                .with_load_factor(load_factor),
        );
        for key in 1..=40 {
            table.insert(key, key, key);
            #[allow(clippy::cast_precision_loss)]
            let reserved = table.capacity() as f64 * f64::from(load_factor);
            assert!(reserved >= table.len() as f64, "capacity {}", table.capacity());
            assert!(table.capacity().is_power_of_two());
        }
        table.check_invariants();
    }

    #[test]
    fn split_preserves_relative_order() {
        let mut table = table(4);
        for hash in [1, 5, 9] {
            table.insert(hash, hash, hash);
        }
        assert_eq!(table.capacity(), 4);
        table.insert(13, 13, 13);
        assert_eq!(table.capacity(), 8);
        let keys = |index| -> Vec<u64> {
            table
                .bucket(index)
                .map_or(Vec::new(), |b| b.iter().map(|(k, _)| *k).collect())
        };
        let (low, high) = (keys(1), keys(5));
        assert_eq!(low, vec![1, 9]);
        assert_eq!(high, vec![5, 13]);
        table.check_invariants();
    }

    #[test]
    fn colliding_keys_treeify_and_untreeify() {
        let mut table = table(64);
        for key in 0..9 {
            table.insert(7, key, key);
        }
        assert!(table.bucket(7).map_or(false, Bucket::is_tree));
        for key in 0..9 {
            assert_eq!(table.get(7, &key), Some((&key, &key)));
        }
        assert_eq!(table.insert(7, 4, 40), Some(4));
        table.check_invariants();

        for key in 0..4 {
            assert_eq!(table.remove(7, &key), Some((key, key)));
        }
        assert!(table.bucket(7).map_or(false, |b| !b.is_tree()));
        assert_eq!(table.get(7, &4), Some((&4, &40)));
        table.check_invariants();
    }

    #[test]
    fn small_table_keeps_chains() {
        let mut table = table(16);
        for key in 0..12 {
            table.insert(3, key, key);
        }
        assert!(table.bucket(3).map_or(false, |b| !b.is_tree() && b.len() == 12));
        table.check_invariants();
    }

    #[test]
    fn retain_and_clear() {
        let mut table = table(64);
        for key in 0..40 {
            table.insert(key % 2, key, key);
        }
        let removed = table.retain(|k, v| {
            *v += 1;
            k % 4 == 0
        });
        assert_eq!(removed, 30);
        assert_eq!(table.len(), 10);
        assert_eq!(table.get(0, &8), Some((&8, &9)));
        assert_eq!(table.iter().count(), 10);
        table.check_invariants();

        let capacity = table.capacity();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.iter().next(), None);
    }

    #[test]
    fn try_insert_keeps_existing() {
        let mut table = table(16);
        assert!(table.try_insert(1, 1, 10).is_ok());
        assert_eq!(table.try_insert(1, 1, 20), Err((1, 20)));
        assert_eq!(table.get(1, &1), Some((&1, &10)));
        assert_eq!(table.remove_at(1, 0, &mut None), Some((1, 10)));
        assert_eq!(table.remove_at(1, 0, &mut None), None);
    }
}
