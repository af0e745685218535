use crate::hash_table::HashTable;
use crate::Config;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::PoisonError;

#[cfg(feature = "loom")]
use loom::sync::atomic::AtomicUsize;
#[cfg(feature = "loom")]
use loom::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
#[cfg(not(feature = "loom"))]
use std::sync::atomic::AtomicUsize;
#[cfg(not(feature = "loom"))]
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// [`Segment`] is an independently locked [`HashTable`].
///
/// The number of entries is mirrored in an atomic counter after each modification so that the
/// size of a [`StripedMap`](crate::StripedMap) can be estimated without acquiring any lock.
pub(super) struct Segment<K, V> {
    table: RwLock<HashTable<K, V>>,
    len: AtomicUsize,
}

impl<K, V> Segment<K, V> {
    pub(super) fn new(config: Config) -> Self {
        Self::from_table(HashTable::new(config))
    }

    pub(super) fn from_table(table: HashTable<K, V>) -> Self {
        let len = table.len();
        Self {
            table: RwLock::new(table),
            len: AtomicUsize::new(len),
        }
    }

    /// Acquires a shared lock on the table.
    ///
    /// A lock poisoned by a panic in user code is taken over as the table itself is never left
    /// in an inconsistent state.
    #[inline]
    pub(super) fn read(&self) -> RwLockReadGuard<'_, HashTable<K, V>> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires an exclusive lock on the table, and runs the closure on it.
    #[inline]
    pub(super) fn write<R, F: FnOnce(&mut HashTable<K, V>) -> R>(&self, f: F) -> R {
        let mut table = self.lock();
        let result = f(&mut table);
        self.len.store(table.len(), Relaxed);
        result
    }

    /// Returns the last published number of entries.
    #[inline]
    pub(super) fn len(&self) -> usize {
        self.len.load(Relaxed)
    }

    #[inline]
    fn lock(&self) -> RwLockWriteGuard<'_, HashTable<K, V>> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}
