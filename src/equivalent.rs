//! Key lookup traits.
//!
//! [`Equivalent`] is re-exported from the [`equivalent`](https://crates.io/crates/equivalent)
//! crate when the `equivalent` feature is enabled, and vendored otherwise.

use std::borrow::Borrow;
use std::cmp::Ordering;

#[cfg(feature = "equivalent")]
pub use ::equivalent::Equivalent;

/// Key equivalence trait.
#[cfg(not(feature = "equivalent"))]
pub trait Equivalent<K: ?Sized> {
    /// Compares `self` to `key` and returns `true` if they are equal.
    fn equivalent(&self, key: &K) -> bool;
}

#[cfg(not(feature = "equivalent"))]
impl<Q: ?Sized, K: ?Sized> Equivalent<K> for Q
where
    Q: Eq,
    K: Borrow<Q>,
{
    #[inline]
    fn equivalent(&self, key: &K) -> bool {
        PartialEq::eq(self, key.borrow())
    }
}

/// Key ordering trait for tree-backed containers.
///
/// Unlike a total order, the comparison may fail: `None` means that `self` cannot be ordered
/// against `key`, e.g., `f64::NAN`.
pub trait Comparable<K: ?Sized> {
    /// Compares `self` to `key` and returns their ordering if one exists.
    fn compare(&self, key: &K) -> Option<Ordering>;
}

impl<Q: ?Sized, K: ?Sized> Comparable<K> for Q
where
    Q: PartialOrd,
    K: Borrow<Q>,
{
    #[inline]
    fn compare(&self, key: &K) -> Option<Ordering> {
        PartialOrd::partial_cmp(self, key.borrow())
    }
}
