//! [`HashMap`] is a separately chained hash map with treeified buckets and a null-key slot.

use super::cursor::{Generation, Tracker};
use super::hash_table::bucket::NodeHint;
use super::hash_table::{self, HashTable};
use super::{Config, CursorState, Equivalent, Error, Map};
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;

/// Single-threaded hash map.
///
/// [`HashMap`] stores entries in a power-of-two array of buckets. A bucket is a chain of entries
/// that is converted into a red-black tree ordered by hash value when it grows beyond
/// [`Config::treeify_threshold`], which bounds the cost of a lookup in a bucket full of
/// colliding keys. The array is doubled once the number of entries exceeds the load factor
/// times the number of buckets; each bucket is split into two buckets while preserving the
/// relative order of its entries.
///
/// ## The null key
///
/// A [`HashMap`] holds at most one entry without a key, the null key, addressed through
/// [`HashMap::put_null`], [`HashMap::get_null`], and [`HashMap::remove_null`]. The null entry is
/// included in [`HashMap::len`] but not in keyed iteration.
///
/// ## Fail-fast cursors
///
/// [`HashMap::cursor`] returns a [`Cursor`] that does not borrow the map, so entries can be
/// removed through it. The cursor fails with [`Error::StructuralChange`] once the map has been
/// structurally modified by anything other than the cursor itself. Replacing the value of an
/// existing key is not a structural modification.
///
/// # Examples
///
/// ```
/// use assoc::HashMap;
///
/// let mut hashmap: HashMap<u64, u32> = HashMap::default();
/// assert!(hashmap.put(1, 10).is_none());
/// assert_eq!(hashmap.put(1, 11), Some(10));
/// assert!(hashmap.put_null(0).is_none());
/// assert_eq!(hashmap.len(), 2);
/// assert_eq!(hashmap.get(&1), Some(&11));
/// ```
pub struct HashMap<K, V, H = RandomState>
where
    H: BuildHasher,
{
    table: HashTable<K, V>,
    null_value: Option<V>,
    generation: Generation,
    build_hasher: H,
}

/// Fail-fast cursor over the keyed entries of a [`HashMap`].
///
/// # Examples
///
/// ```
/// use assoc::{CursorState, Error, HashMap};
///
/// let mut hashmap: HashMap<u64, u32> = (0..8).map(|k| (k, 0)).collect();
///
/// let mut cursor = hashmap.cursor();
/// while let Some((k, _)) = cursor.next(&hashmap).unwrap() {
///     if k % 2 == 0 {
///         assert!(cursor.remove(&mut hashmap).is_ok());
///         assert_eq!(cursor.state(), CursorState::Removed);
///     }
/// }
/// assert_eq!(cursor.state(), CursorState::Exhausted);
/// assert_eq!(hashmap.len(), 4);
///
/// let mut cursor = hashmap.cursor();
/// hashmap.put(8, 0);
/// assert_eq!(cursor.next(&hashmap), Err(Error::StructuralChange));
/// ```
#[derive(Clone, Debug)]
pub struct Cursor {
    tracker: Tracker,
    bucket: usize,
    ordinal: usize,
    hint: NodeHint,
}

/// An iterator over the keyed entries of a [`HashMap`].
pub struct Iter<'h, K, V> {
    inner: hash_table::Iter<'h, K, V>,
}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<'h, K, V> {
    inner: hash_table::Iter<'h, K, V>,
}

/// An iterator over the values of a [`HashMap`].
pub struct Values<'h, K, V> {
    inner: hash_table::Iter<'h, K, V>,
}

impl<K, V, H> HashMap<K, V, H>
where
    H: BuildHasher,
{
    /// Creates an empty [`HashMap`] with the given [`BuildHasher`].
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let hashmap: HashMap<u64, u32, RandomState> = HashMap::with_hasher(RandomState::new());
    /// assert_eq!(hashmap.capacity(), 16);
    /// ```
    #[inline]
    pub fn with_hasher(build_hasher: H) -> Self {
        Self::from_parts(Config::default(), build_hasher)
    }

    /// Creates an empty [`HashMap`] with the specified number of buckets and [`BuildHasher`].
    ///
    /// The actual number of buckets is the smallest power of two equal to or greater than the
    /// specified capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let hashmap: HashMap<u64, u32, RandomState> =
    ///     HashMap::with_capacity_and_hasher(1000, RandomState::new());
    ///
    /// let result = hashmap.capacity();
    /// assert_eq!(result, 1024);
    /// ```
    #[inline]
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: H) -> Self {
        Self::from_parts(
            Config::default().with_initial_capacity(capacity),
            build_hasher,
        )
    }

    /// Creates an empty [`HashMap`] with the specified [`Config`] and [`BuildHasher`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the [`Config`] is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::{Config, HashMap};
    /// use std::collections::hash_map::RandomState;
    ///
    /// let config = Config::default().with_load_factor(-1.0);
    /// let result: Result<HashMap<u64, u32>, _> =
    ///     HashMap::with_config_and_hasher(config, RandomState::new());
    /// assert!(result.is_err());
    /// ```
    #[inline]
    pub fn with_config_and_hasher(config: Config, build_hasher: H) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::from_parts(config, build_hasher))
    }

    /// Returns the number of entries including the null entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let mut hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(hashmap.put(1, 0).is_none());
    /// assert!(hashmap.put_null(0).is_none());
    /// assert_eq!(hashmap.len(), 2);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len() + usize::from(self.null_value.is_some())
    }

    /// Returns `true` if the [`HashMap`] is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty() && self.null_value.is_none()
    }

    /// Returns the number of buckets.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let mut hashmap: HashMap<u64, u32> = HashMap::with_capacity(16);
    ///
    /// for key in 0..12 {
    ///     hashmap.put(key, 0);
    /// }
    /// assert_eq!(hashmap.capacity(), 16);
    ///
    /// hashmap.put(12, 0);
    /// assert_eq!(hashmap.capacity(), 32);
    /// ```
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the load factor.
    #[inline]
    pub fn load_factor(&self) -> f32 {
        self.table.config().load_factor()
    }

    /// Returns the [`Config`] of the [`HashMap`].
    #[inline]
    pub fn config(&self) -> &Config {
        self.table.config()
    }

    /// Returns a reference to its [`BuildHasher`].
    #[inline]
    pub fn hasher(&self) -> &H {
        &self.build_hasher
    }

    /// Associates a value with the null key, returning the previous value.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let mut hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(hashmap.put_null(1).is_none());
    /// assert_eq!(hashmap.put_null(2), Some(1));
    /// ```
    #[inline]
    pub fn put_null(&mut self, value: V) -> Option<V> {
        let old = self.null_value.replace(value);
        if old.is_none() {
            self.generation.bump();
        }
        old
    }

    /// Returns a reference to the value associated with the null key.
    #[inline]
    pub fn get_null(&self) -> Option<&V> {
        self.null_value.as_ref()
    }

    /// Returns a mutable reference to the value associated with the null key.
    #[inline]
    pub fn get_null_mut(&mut self) -> Option<&mut V> {
        self.null_value.as_mut()
    }

    /// Removes the null key, returning its value.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let mut hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(hashmap.remove_null().is_none());
    /// assert!(hashmap.put_null(1).is_none());
    /// assert_eq!(hashmap.remove_null(), Some(1));
    /// assert!(!hashmap.contains_null_key());
    /// ```
    #[inline]
    pub fn remove_null(&mut self) -> Option<V> {
        let old = self.null_value.take();
        if old.is_some() {
            self.generation.bump();
        }
        old
    }

    /// Returns `true` if the null key is present.
    #[inline]
    pub fn contains_null_key(&self) -> bool {
        self.null_value.is_some()
    }

    /// Retains the keyed entries satisfying the predicate.
    ///
    /// The null entry is not passed to the predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let mut hashmap: HashMap<u64, u32> = (0..10).map(|k| (k, 0)).collect();
    ///
    /// hashmap.retain(|k, v| {
    ///     *v = 1;
    ///     k % 3 == 0
    /// });
    /// assert_eq!(hashmap.len(), 4);
    /// assert_eq!(hashmap.get(&9), Some(&1));
    /// ```
    #[inline]
    pub fn retain<F: FnMut(&K, &mut V) -> bool>(&mut self, pred: F) {
        if self.table.retain(pred) != 0 {
            self.generation.bump();
        }
    }

    /// Removes every entry; the number of buckets is retained.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let mut hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// hashmap.put(1, 0);
    /// hashmap.put_null(0);
    /// hashmap.clear();
    /// assert!(hashmap.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.table.clear();
            self.null_value = None;
            self.generation.bump();
        }
    }

    /// Returns an iterator over the keyed entries in bucket order.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = (0..4).map(|k| (k, 1)).collect();
    ///
    /// assert_eq!(hashmap.iter().map(|(_, v)| v).sum::<u32>(), 4);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys.
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the values of the keyed entries.
    #[inline]
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.table.iter(),
        }
    }

    /// Creates a fail-fast [`Cursor`] over the keyed entries.
    #[inline]
    pub fn cursor(&self) -> Cursor {
        Cursor {
            tracker: Tracker::new(&self.generation),
            bucket: 0,
            ordinal: 0,
            hint: None,
        }
    }

    fn from_parts(config: Config, build_hasher: H) -> Self {
        Self {
            table: HashTable::new(config),
            null_value: None,
            generation: Generation::new(),
            build_hasher,
        }
    }
}

impl<K, V, H> HashMap<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher,
{
    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// The existing key is retained if the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let mut hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(hashmap.put(1, 0).is_none());
    /// assert_eq!(hashmap.put(1, 1), Some(0));
    /// ```
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let hash = hash_table::hash(&self.build_hasher, &key);
        let old = self.table.insert(hash, key, value);
        if old.is_none() {
            self.generation.bump();
        }
        old
    }

    /// Returns a reference to the value associated with the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let mut hashmap: HashMap<String, u32> = HashMap::default();
    ///
    /// hashmap.put("one".to_string(), 1);
    /// assert_eq!(hashmap.get("one"), Some(&1));
    /// assert!(hashmap.get("two").is_none());
    /// ```
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and a reference to the value associated with the key.
    #[inline]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let hash = hash_table::hash(&self.build_hasher, key);
        self.table.get(hash, key)
    }

    /// Returns a mutable reference to the value associated with the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let mut hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// hashmap.put(1, 0);
    /// if let Some(v) = hashmap.get_mut(&1) {
    ///     *v = 2;
    /// }
    /// assert_eq!(hashmap.get(&1), Some(&2));
    /// ```
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let hash = hash_table::hash(&self.build_hasher, key);
        self.table.get_mut(hash, key).map(|(_, v)| v)
    }

    /// Returns `true` if the key is present.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.get_key_value(key).is_some()
    }

    /// Removes the key, returning its value.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let mut hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(hashmap.remove(&1).is_none());
    /// hashmap.put(1, 0);
    /// assert_eq!(hashmap.remove(&1), Some(0));
    /// assert!(hashmap.is_empty());
    /// ```
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes the key, returning the stored key and its value.
    #[inline]
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let hash = hash_table::hash(&self.build_hasher, key);
        let removed = self.table.remove(hash, key);
        if removed.is_some() {
            self.generation.bump();
        }
        removed
    }
}

impl<K, V> HashMap<K, V, RandomState> {
    /// Creates an empty default [`HashMap`].
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::new();
    ///
    /// let result = hashmap.capacity();
    /// assert_eq!(result, 16);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty [`HashMap`] with the specified number of buckets.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::with_capacity(100);
    ///
    /// let result = hashmap.capacity();
    /// assert_eq!(result, 128);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }

    /// Creates an empty [`HashMap`] with the specified [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the [`Config`] is invalid.
    #[inline]
    pub fn with_config(config: Config) -> Result<Self, Error> {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K, V, H> Clone for HashMap<K, V, H>
where
    K: Clone,
    V: Clone,
    H: BuildHasher + Clone,
{
    #[inline]
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            null_value: self.null_value.clone(),
            generation: self.generation.clone(),
            build_hasher: self.build_hasher.clone(),
        }
    }
}

impl<K, V, H> Debug for HashMap<K, V, H>
where
    K: Debug,
    V: Debug,
    H: BuildHasher,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_map();
        if let Some(value) = self.null_value.as_ref() {
            d.entry(&format_args!("<null>"), value);
        }
        d.entries(self.iter()).finish()
    }
}

impl<K, V, H> Default for HashMap<K, V, H>
where
    H: BuildHasher + Default,
{
    /// Creates an empty default [`HashMap`].
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// let result = hashmap.capacity();
    /// assert_eq!(result, 16);
    /// ```
    #[inline]
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<K, V, H> Extend<(K, V)> for HashMap<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher,
{
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        iter.into_iter().for_each(|(k, v)| {
            self.put(k, v);
        });
    }
}

impl<K, V, H> FromIterator<(K, V)> for HashMap<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher + Default,
{
    #[inline]
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut hashmap = Self::default();
        hashmap.extend(iter);
        hashmap
    }
}

impl<'h, K, V, H> IntoIterator for &'h HashMap<K, V, H>
where
    H: BuildHasher,
{
    type Item = (&'h K, &'h V);
    type IntoIter = Iter<'h, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, H> PartialEq for HashMap<K, V, H>
where
    K: Eq + Hash,
    V: PartialEq,
    H: BuildHasher,
{
    /// Compares two [`HashMap`] instances entry by entry, including the null entry.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.null_value == other.null_value
            && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, H> Map for HashMap<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher,
{
    type Key = K;
    type Value = V;
    type Iter<'m> = Iter<'m, K, V> where Self: 'm;
    type Cursor = Cursor;

    #[inline]
    fn put(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        Ok(HashMap::put(self, key, value))
    }

    #[inline]
    fn put_null(&mut self, value: V) -> Result<Option<V>, Error> {
        Ok(HashMap::put_null(self, value))
    }

    #[inline]
    fn get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    #[inline]
    fn get_null(&self) -> Option<&V> {
        HashMap::get_null(self)
    }

    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        HashMap::remove(self, key)
    }

    #[inline]
    fn remove_null(&mut self) -> Option<V> {
        HashMap::remove_null(self)
    }

    #[inline]
    fn contains_key(&self, key: &K) -> bool {
        HashMap::contains_key(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        HashMap::clear(self);
    }

    #[inline]
    fn iter(&self) -> Self::Iter<'_> {
        HashMap::iter(self)
    }

    #[inline]
    fn cursor(&self) -> Cursor {
        HashMap::cursor(self)
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
    /// Returns the next keyed entry of the [`HashMap`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralChange`] if the [`HashMap`] was structurally modified other
    /// than through this cursor, or if it is not the [`HashMap`] that created the cursor.
    #[inline]
    pub fn next<'h, K, V, H>(
        &mut self,
        hashmap: &'h HashMap<K, V, H>,
    ) -> Result<Option<(&'h K, &'h V)>, Error>
    where
        H: BuildHasher,
    {
        self.tracker.check(&hashmap.generation)?;
        if self.tracker.state() == CursorState::Exhausted {
            return Ok(None);
        }
        while let Some(bucket) = hashmap.table.bucket(self.bucket) {
            if let Some(entry) = bucket.entry_at(self.ordinal, &mut self.hint) {
                self.ordinal += 1;
                self.tracker.yielded();
                return Ok(Some(entry));
            }
            self.bucket += 1;
            self.ordinal = 0;
            self.hint = None;
        }
        self.tracker.exhausted();
        Ok(None)
    }

    /// Removes the entry last returned by [`Cursor::next`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralChange`] as [`Cursor::next`] does, or
    /// [`Error::NoCurrentEntry`] if [`Cursor::next`] has not returned an entry since the cursor
    /// was created or since the last removal.
    #[inline]
    pub fn remove<K, V, H>(&mut self, hashmap: &mut HashMap<K, V, H>) -> Result<(K, V), Error>
    where
        H: BuildHasher,
    {
        self.tracker.check_removable(&hashmap.generation)?;
        let ordinal = self.ordinal.checked_sub(1).ok_or(Error::NoCurrentEntry)?;
        let entry = hashmap
            .table
            .remove_at(self.bucket, ordinal, &mut self.hint)
            .ok_or(Error::NoCurrentEntry)?;
        self.ordinal = ordinal;
        hashmap.generation.bump();
        self.tracker.removed(&hashmap.generation);
        Ok(entry)
    }

    /// Returns the state of the cursor.
    #[inline]
    pub fn state(&self) -> CursorState {
        self.tracker.state()
    }
}

impl<'h, K, V> Iterator for Iter<'h, K, V> {
    type Item = (&'h K, &'h V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'h, K, V> Iterator for Keys<'h, K, V> {
    type Item = &'h K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<'h, K, V> Iterator for Values<'h, K, V> {
    type Item = &'h V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

#[cfg(all(test, not(feature = "loom")))]
impl<K, V, H> HashMap<K, V, H>
where
    H: BuildHasher,
{
    pub(crate) fn check_invariants(&self) {
        self.table.check_invariants();
    }
}
