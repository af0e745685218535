//! [`StripedMap`] is a thread-safe hash map partitioned into independently locked segments.

mod segment;

use super::hash_table::{self, capacity_for, spread, HashTable};
use super::{Config, Equivalent, Error};
use segment::Segment;
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;
use std::vec;

/// Thread-safe hash map with lock striping.
///
/// [`StripedMap`] owns a fixed power-of-two number of segments, each of which is a hash table
/// protected by its own read-write lock. An operation on a key locks only the segment the key
/// belongs to, therefore operations on keys in different segments run in parallel, and a segment
/// resizes itself while holding its own lock without affecting other segments.
///
/// ## Consistency
///
/// Operations on a single key are linearizable in the order the segment lock is acquired. No
/// ordering is guaranteed across segments: [`StripedMap::len`] is an estimate summed over
/// segments without locking, and [`StripedMap::iter`] reflects each segment as of the moment
/// it is visited. [`StripedMap::len_consistent`] locks every segment in ascending index order to
/// take an exact count.
///
/// ## Locking behavior
///
/// User closures passed to [`StripedMap::read`], [`StripedMap::update`],
/// [`StripedMap::compute_if_absent`], and similar methods run under the segment lock; accessing
/// the same [`StripedMap`] from within them may lead to a deadlock.
///
/// # Examples
///
/// ```
/// use assoc::StripedMap;
/// use std::sync::Arc;
/// use std::thread;
///
/// let stripedmap: Arc<StripedMap<u64, u64>> = Arc::new(StripedMap::new());
///
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let stripedmap = stripedmap.clone();
///         thread::spawn(move || {
///             for k in 0..100 {
///                 assert!(stripedmap.put_if_absent(t * 100 + k, k).is_ok());
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(stripedmap.len_consistent(), 400);
/// ```
pub struct StripedMap<K, V, H = RandomState>
where
    H: BuildHasher,
{
    segments: Box<[Segment<K, V>]>,
    segment_bits: u32,
    build_hasher: H,
}

/// A weakly consistent iterator over the entries of a [`StripedMap`].
///
/// Entries of one segment are cloned at once under its shared lock; no lock is held between
/// calls to [`Iterator::next`].
pub struct Iter<'s, K, V, H = RandomState>
where
    H: BuildHasher,
{
    stripedmap: &'s StripedMap<K, V, H>,
    next_segment: usize,
    buffer: vec::IntoIter<(K, V)>,
}

impl<K, V, H> StripedMap<K, V, H>
where
    H: BuildHasher,
{
    /// The default number of segments.
    pub const DEFAULT_SEGMENTS: usize = 16;

    /// The largest number of segments.
    pub const MAX_SEGMENTS: usize = 1 << 16;

    /// Creates an empty [`StripedMap`] with the given [`BuildHasher`].
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let stripedmap: StripedMap<u64, u32, RandomState> =
    ///     StripedMap::with_hasher(RandomState::new());
    /// assert_eq!(stripedmap.num_segments(), 16);
    /// ```
    #[inline]
    pub fn with_hasher(build_hasher: H) -> Self {
        Self::with_segments_and_hasher(Self::DEFAULT_SEGMENTS, build_hasher)
    }

    /// Creates an empty [`StripedMap`] with the specified number of segments and
    /// [`BuildHasher`].
    ///
    /// The number of segments is rounded up to a power of two.
    #[inline]
    pub fn with_segments_and_hasher(segments: usize, build_hasher: H) -> Self {
        Self::from_parts(segments, Config::default(), build_hasher)
    }

    /// Creates an empty [`StripedMap`] with the specified total capacity and [`BuildHasher`].
    #[inline]
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: H) -> Self {
        Self::from_parts(
            Self::DEFAULT_SEGMENTS,
            Config::default().with_initial_capacity(capacity),
            build_hasher,
        )
    }

    /// Creates an empty [`StripedMap`] with the specified number of segments, [`Config`], and
    /// [`BuildHasher`].
    ///
    /// The initial capacity of the [`Config`] is divided among the segments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the [`Config`] is invalid.
    #[inline]
    pub fn with_config_and_hasher(
        segments: usize,
        config: Config,
        build_hasher: H,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::from_parts(segments, config, build_hasher))
    }

    /// Returns the number of segments.
    #[inline]
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Returns an estimate of the number of entries.
    ///
    /// The per-segment counts are read without locking, therefore the result may not reflect
    /// concurrent modifications.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u32> = StripedMap::default();
    ///
    /// assert!(stripedmap.put(1, 0).is_none());
    /// assert_eq!(stripedmap.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    /// Returns `true` if the estimated number of entries is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the exact number of entries.
    ///
    /// Shared locks on all the segments are acquired in ascending index order and held until
    /// every segment has been counted.
    #[inline]
    pub fn len_consistent(&self) -> usize {
        let guards: Vec<_> = self.segments.iter().map(Segment::read).collect();
        guards.iter().map(|table| table.len()).sum()
    }

    /// Returns the estimated number of entries in each segment.
    #[inline]
    pub fn segment_lens(&self) -> Vec<usize> {
        self.segments.iter().map(Segment::len).collect()
    }

    /// Returns the total number of buckets.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u32> = StripedMap::with_capacity(1000);
    /// assert_eq!(stripedmap.capacity(), 1024);
    /// ```
    #[inline]
    pub fn capacity(&self) -> usize {
        self.segments.iter().map(|s| s.read().capacity()).sum()
    }

    /// Removes every entry.
    ///
    /// Segments are cleared one at a time.
    #[inline]
    pub fn clear(&self) {
        self.segments.iter().for_each(|s| s.write(HashTable::clear));
    }

    /// Retains the entries satisfying the predicate.
    ///
    /// Segments are visited one at a time under their exclusive locks.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u32> = (0..10).map(|k| (k, 0)).collect();
    ///
    /// stripedmap.retain(|k, _| k % 2 == 0);
    /// assert_eq!(stripedmap.len(), 5);
    /// ```
    #[inline]
    pub fn retain<F: FnMut(&K, &mut V) -> bool>(&self, mut pred: F) {
        for segment in self.segments.iter() {
            segment.write(|table| table.retain(&mut pred));
        }
    }

    /// Scans every entry.
    ///
    /// Segments are visited one at a time under their shared locks.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u64> = (0..10).map(|k| (k, k)).collect();
    ///
    /// let mut sum = 0;
    /// stripedmap.scan(|_, v| sum += v);
    /// assert_eq!(sum, 45);
    /// ```
    #[inline]
    pub fn scan<F: FnMut(&K, &V)>(&self, mut scanner: F) {
        for segment in self.segments.iter() {
            segment.read().iter().for_each(|(k, v)| scanner(k, v));
        }
    }

    /// Returns a weakly consistent iterator over cloned entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u64> = (0..10).map(|k| (k, k)).collect();
    ///
    /// let mut keys: Vec<u64> = stripedmap.iter().map(|(k, _)| k).collect();
    /// keys.sort_unstable();
    /// assert_eq!(keys, (0..10).collect::<Vec<_>>());
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V, H>
    where
        K: Clone,
        V: Clone,
    {
        Iter {
            stripedmap: self,
            next_segment: 0,
            buffer: Vec::new().into_iter(),
        }
    }

    fn from_parts(segments: usize, config: Config, build_hasher: H) -> Self {
        let num_segments = segments
            .max(1)
            .checked_next_power_of_two()
            .map_or(Self::MAX_SEGMENTS, |n| n.min(Self::MAX_SEGMENTS));
        let requested = config.initial_capacity();
        let per_segment = requested / num_segments + usize::from(requested % num_segments != 0);
        let segment_config = config.with_initial_capacity(capacity_for(per_segment));
        Self {
            segments: (0..num_segments)
                .map(|_| Segment::new(segment_config))
                .collect(),
            segment_bits: num_segments.trailing_zeros(),
            build_hasher,
        }
    }

    /// Returns the segment and the hash value passed down to it.
    #[inline]
    fn locate(&self, hash: u64) -> (&Segment<K, V>, u64) {
        #[allow(clippy::cast_possible_truncation)]
        let index = spread(hash) as usize & (self.segments.len() - 1);
        (&self.segments[index], hash.rotate_right(self.segment_bits))
    }
}

impl<K, V, H> StripedMap<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher,
{
    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u32> = StripedMap::default();
    ///
    /// assert!(stripedmap.put(1, 0).is_none());
    /// assert_eq!(stripedmap.put(1, 1), Some(0));
    /// ```
    #[inline]
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let (segment, hash) = self.locate(hash_table::hash(&self.build_hasher, &key));
        segment.write(|table| table.insert(hash, key, value))
    }

    /// Inserts a key-value pair if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns the supplied key-value pair if the key is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u32> = StripedMap::default();
    ///
    /// assert!(stripedmap.put_if_absent(1, 0).is_ok());
    /// assert_eq!(stripedmap.put_if_absent(1, 1), Err((1, 1)));
    /// ```
    #[inline]
    pub fn put_if_absent(&self, key: K, value: V) -> Result<(), (K, V)> {
        let (segment, hash) = self.locate(hash_table::hash(&self.build_hasher, &key));
        segment.write(|table| table.try_insert(hash, key, value))
    }

    /// Returns a clone of the value associated with the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, String> = StripedMap::default();
    ///
    /// assert!(stripedmap.get(&1).is_none());
    /// stripedmap.put(1, "one".to_string());
    /// assert_eq!(stripedmap.get(&1).as_deref(), Some("one"));
    /// ```
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        V: Clone,
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.read(key, |_, v| v.clone())
    }

    /// Reads the entry associated with the key under the shared segment lock.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, String> = StripedMap::default();
    ///
    /// stripedmap.put(1, "one".to_string());
    /// assert_eq!(stripedmap.read(&1, |_, v| v.len()), Some(3));
    /// ```
    #[inline]
    pub fn read<Q, R, F: FnOnce(&K, &V) -> R>(&self, key: &Q, reader: F) -> Option<R>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let (segment, hash) = self.locate(hash_table::hash(&self.build_hasher, key));
        let table = segment.read();
        table.get(hash, key).map(|(k, v)| reader(k, v))
    }

    /// Returns `true` if the key is present.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.read(key, |_, _| ()).is_some()
    }

    /// Removes the key, returning the stored key and its value.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u32> = StripedMap::default();
    ///
    /// assert!(stripedmap.remove(&1).is_none());
    /// stripedmap.put(1, 0);
    /// assert_eq!(stripedmap.remove(&1), Some((1, 0)));
    /// ```
    #[inline]
    pub fn remove<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.remove_if(key, |_| true)
    }

    /// Removes the key if the condition holds for its value.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u32> = StripedMap::default();
    ///
    /// stripedmap.put(1, 0);
    /// assert!(stripedmap.remove_if(&1, |v| *v == 1).is_none());
    /// assert_eq!(stripedmap.remove_if(&1, |v| *v == 0), Some((1, 0)));
    /// ```
    #[inline]
    pub fn remove_if<Q, F: FnOnce(&mut V) -> bool>(&self, key: &Q, condition: F) -> Option<(K, V)>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let (segment, hash) = self.locate(hash_table::hash(&self.build_hasher, key));
        segment.write(|table| {
            let (_, v) = table.get_mut(hash, key)?;
            if condition(v) {
                table.remove(hash, key)
            } else {
                None
            }
        })
    }

    /// Returns a clone of the value associated with the key, inserting the value produced by
    /// the constructor if the key is absent.
    ///
    /// The constructor runs at most once, under the exclusive segment lock.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u64> = StripedMap::default();
    ///
    /// assert_eq!(stripedmap.compute_if_absent(3, |k| k * 10), 30);
    /// assert_eq!(stripedmap.compute_if_absent(3, |_| 0), 30);
    /// ```
    #[inline]
    pub fn compute_if_absent<F: FnOnce(&K) -> V>(&self, key: K, constructor: F) -> V
    where
        V: Clone,
    {
        let (segment, hash) = self.locate(hash_table::hash(&self.build_hasher, &key));
        segment.write(|table| {
            if let Some((_, v)) = table.get(hash, &key) {
                return v.clone();
            }
            let value = constructor(&key);
            table.insert(hash, key, value.clone());
            value
        })
    }

    /// Updates the value associated with the key under the exclusive segment lock.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u32> = StripedMap::default();
    ///
    /// assert!(stripedmap.update(&1, |_, v| *v += 1).is_none());
    /// stripedmap.put(1, 0);
    /// assert_eq!(stripedmap.update(&1, |_, v| { *v += 1; *v }), Some(1));
    /// ```
    #[inline]
    pub fn update<Q, U, R>(&self, key: &Q, updater: U) -> Option<R>
    where
        Q: Equivalent<K> + Hash + ?Sized,
        U: FnOnce(&K, &mut V) -> R,
    {
        let (segment, hash) = self.locate(hash_table::hash(&self.build_hasher, key));
        segment.write(|table| table.get_mut(hash, key).map(|(k, v)| updater(k, v)))
    }

    /// Merges a value into the entry associated with the key.
    ///
    /// The value is inserted if the key is absent. Otherwise the remapping function receives the
    /// old and the supplied value, and the entry is replaced with the result or removed if the
    /// result is `None`. Returns `true` if the key is present afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<&str, u32> = StripedMap::default();
    ///
    /// assert!(stripedmap.merge("a", 1, |old, new| Some(old + new)));
    /// assert!(stripedmap.merge("a", 2, |old, new| Some(old + new)));
    /// assert_eq!(stripedmap.get("a"), Some(3));
    /// assert!(!stripedmap.merge("a", 0, |_, _| None));
    /// assert!(!stripedmap.contains_key("a"));
    /// ```
    #[inline]
    pub fn merge<F: FnOnce(V, V) -> Option<V>>(&self, key: K, value: V, remapping: F) -> bool {
        let (segment, hash) = self.locate(hash_table::hash(&self.build_hasher, &key));
        segment.write(|table| match table.remove(hash, &key) {
            Some((k, old)) => remapping(old, value).map_or(false, |merged| {
                table.insert(hash, k, merged);
                true
            }),
            None => {
                table.insert(hash, key, value);
                true
            }
        })
    }

    /// Returns the index of the segment the key belongs to.
    #[inline]
    pub fn segment_index<Q>(&self, key: &Q) -> usize
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        #[allow(clippy::cast_possible_truncation)]
        let index = spread(hash_table::hash(&self.build_hasher, key)) as usize;
        index & (self.segments.len() - 1)
    }
}

impl<K, V> StripedMap<K, V, RandomState> {
    /// Creates an empty default [`StripedMap`].
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u32> = StripedMap::new();
    ///
    /// let result = stripedmap.capacity();
    /// assert_eq!(result, 16);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty [`StripedMap`] with the specified number of segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::StripedMap;
    ///
    /// let stripedmap: StripedMap<u64, u32> = StripedMap::with_segments(5);
    /// assert_eq!(stripedmap.num_segments(), 8);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_segments(segments: usize) -> Self {
        Self::with_segments_and_hasher(segments, RandomState::new())
    }

    /// Creates an empty [`StripedMap`] with the specified total capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }

    /// Creates an empty [`StripedMap`] with the specified number of segments and [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the [`Config`] is invalid.
    #[inline]
    pub fn with_config(segments: usize, config: Config) -> Result<Self, Error> {
        Self::with_config_and_hasher(segments, config, RandomState::new())
    }
}

impl<K, V, H> Clone for StripedMap<K, V, H>
where
    K: Clone,
    V: Clone,
    H: BuildHasher + Clone,
{
    /// Clones the [`StripedMap`] one segment at a time.
    #[inline]
    fn clone(&self) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .map(|s| Segment::from_table(s.read().clone()))
                .collect(),
            segment_bits: self.segment_bits,
            build_hasher: self.build_hasher.clone(),
        }
    }
}

impl<K, V, H> Debug for StripedMap<K, V, H>
where
    K: Debug,
    V: Debug,
    H: BuildHasher,
{
    /// Scans every entry to print them.
    ///
    /// ## Locking behavior
    ///
    /// Shared segment locks are acquired one at a time.
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_map();
        self.scan(|k, v| {
            d.entry(k, v);
        });
        d.finish()
    }
}

impl<K, V, H> Default for StripedMap<K, V, H>
where
    H: BuildHasher + Default,
{
    #[inline]
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<K, V, H> FromIterator<(K, V)> for StripedMap<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher + Default,
{
    #[inline]
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let stripedmap = Self::default();
        iter.into_iter().for_each(|(k, v)| {
            stripedmap.put(k, v);
        });
        stripedmap
    }
}

impl<K, V, H> Iterator for Iter<'_, K, V, H>
where
    K: Clone,
    V: Clone,
    H: BuildHasher,
{
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.buffer.next() {
                return Some(entry);
            }
            let segment = self.stripedmap.segments.get(self.next_segment)?;
            self.next_segment += 1;
            self.buffer = segment
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Vec<_>>()
                .into_iter();
        }
    }
}

impl<K, V, H> FusedIterator for Iter<'_, K, V, H>
where
    K: Clone,
    V: Clone,
    H: BuildHasher,
{
}

#[cfg(all(test, not(feature = "loom")))]
impl<K, V, H> StripedMap<K, V, H>
where
    H: BuildHasher,
{
    pub(crate) fn check_invariants(&self) {
        for segment in self.segments.iter() {
            let table = segment.read();
            table.check_invariants();
            assert_eq!(table.len(), segment.len());
        }
    }
}
