//! [`Config`] tunes the bucket array of hash-backed containers.

use super::Error;

/// Sizing and collision-policy parameters of a hash table.
///
/// # Examples
///
/// ```
/// use assoc::{Config, HashMap};
///
/// let config = Config::default().with_initial_capacity(100).with_load_factor(0.5);
/// let hashmap: HashMap<u64, u32> = HashMap::with_config(config).unwrap();
/// assert_eq!(hashmap.capacity(), 128);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    initial_capacity: usize,
    load_factor: f32,
    treeify_threshold: usize,
    untreeify_threshold: usize,
    min_treeify_capacity: usize,
}

impl Config {
    /// The default number of buckets.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

    /// The default ratio of entries to buckets that triggers a resize when exceeded.
    pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

    /// The default chain length above which a bucket is converted into a tree.
    pub const DEFAULT_TREEIFY_THRESHOLD: usize = 8;

    /// The default tree size below which a treeified bucket is converted back into a chain.
    pub const DEFAULT_UNTREEIFY_THRESHOLD: usize = 6;

    /// The default minimum number of buckets for a bucket to be treeified.
    pub const DEFAULT_MIN_TREEIFY_CAPACITY: usize = 64;

    /// Creates a [`Config`] with the default parameters.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            load_factor: Self::DEFAULT_LOAD_FACTOR,
            treeify_threshold: Self::DEFAULT_TREEIFY_THRESHOLD,
            untreeify_threshold: Self::DEFAULT_UNTREEIFY_THRESHOLD,
            min_treeify_capacity: Self::DEFAULT_MIN_TREEIFY_CAPACITY,
        }
    }

    /// Sets the initial number of buckets.
    ///
    /// The actual number of buckets is the smallest power of two that is equal to or greater
    /// than the specified capacity, and at least `1`.
    #[inline]
    #[must_use]
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the load factor.
    #[inline]
    #[must_use]
    pub const fn with_load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Sets the chain length above which a bucket is treeified.
    #[inline]
    #[must_use]
    pub const fn with_treeify_threshold(mut self, treeify_threshold: usize) -> Self {
        self.treeify_threshold = treeify_threshold;
        self
    }

    /// Sets the tree size below which a treeified bucket is turned back into a chain.
    #[inline]
    #[must_use]
    pub const fn with_untreeify_threshold(mut self, untreeify_threshold: usize) -> Self {
        self.untreeify_threshold = untreeify_threshold;
        self
    }

    /// Sets the minimum number of buckets required for treeification.
    #[inline]
    #[must_use]
    pub const fn with_min_treeify_capacity(mut self, min_treeify_capacity: usize) -> Self {
        self.min_treeify_capacity = min_treeify_capacity;
        self
    }

    /// Returns the requested initial capacity.
    #[inline]
    #[must_use]
    pub const fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Returns the load factor.
    #[inline]
    #[must_use]
    pub const fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Returns the treeify threshold.
    #[inline]
    #[must_use]
    pub const fn treeify_threshold(&self) -> usize {
        self.treeify_threshold
    }

    /// Returns the untreeify threshold.
    #[inline]
    #[must_use]
    pub const fn untreeify_threshold(&self) -> usize {
        self.untreeify_threshold
    }

    /// Returns the minimum treeify capacity.
    #[inline]
    #[must_use]
    pub const fn min_treeify_capacity(&self) -> usize {
        self.min_treeify_capacity
    }

    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the load factor is not a positive finite number, or
    /// the treeify thresholds cannot separate chains from trees.
    ///
    /// # Examples
    ///
    /// ```
    /// use assoc::{Config, Error};
    ///
    /// assert!(Config::default().validate().is_ok());
    /// assert!(matches!(
    ///     Config::default().with_load_factor(0.0).validate(),
    ///     Err(Error::InvalidConfig(_))
    /// ));
    /// ```
    pub fn validate(&self) -> Result<(), Error> {
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(Error::InvalidConfig("load factor must be positive and finite"));
        }
        if self.treeify_threshold < 2 {
            return Err(Error::InvalidConfig("treeify threshold must be at least 2"));
        }
        if self.untreeify_threshold >= self.treeify_threshold {
            return Err(Error::InvalidConfig(
                "untreeify threshold must be less than the treeify threshold",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
