//! Generation tracking for fail-fast cursors.
//!
//! Every single-threaded container owns a [`Generation`]: a container identity and a counter
//! that is incremented by each structural change, that is, an insertion of a new key, a
//! removal, or a bulk removal. A cursor records both when it is created and compares them
//! against the container on every call.

use super::Error;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering::Relaxed;

/// The state of a cursor.
///
/// ```text
/// Created --next--> Iterating --next--> ... --next--> Exhausted
///                     |    ^
///                  remove  next
///                     v    |
///                    Removed
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorState {
    /// No entry has been returned yet.
    Created,
    /// The last call to `next` returned an entry.
    Iterating,
    /// The last entry returned by `next` was removed through the cursor.
    Removed,
    /// Every entry has been visited.
    Exhausted,
}

/// Structural-change counter of a container.
#[derive(Debug)]
pub(crate) struct Generation {
    origin: u64,
    count: u64,
}

/// A snapshot of a [`Generation`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Stamp {
    origin: u64,
    count: u64,
}

impl Generation {
    /// Creates a [`Generation`] with a unique container identity.
    pub(crate) fn new() -> Self {
        Self {
            origin: next_origin(),
            count: 0,
        }
    }

    /// Records a structural change.
    #[inline]
    pub(crate) fn bump(&mut self) {
        self.count = self.count.wrapping_add(1);
    }

    #[inline]
    pub(crate) fn stamp(&self) -> Stamp {
        Stamp {
            origin: self.origin,
            count: self.count,
        }
    }
}

impl Clone for Generation {
    /// A cloned container is a distinct container: cursors of the source are not valid for it.
    #[inline]
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl Default for Generation {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// The container-independent part of a cursor.
#[derive(Clone, Debug)]
pub(crate) struct Tracker {
    stamp: Stamp,
    state: CursorState,
}

impl Tracker {
    #[inline]
    pub(crate) fn new(generation: &Generation) -> Self {
        Self {
            stamp: generation.stamp(),
            state: CursorState::Created,
        }
    }

    #[inline]
    pub(crate) fn state(&self) -> CursorState {
        self.state
    }

    /// Fails if the container is not the one the cursor was created for, or if it has been
    /// structurally modified by anything other than this cursor.
    #[inline]
    pub(crate) fn check(&self, generation: &Generation) -> Result<(), Error> {
        if self.stamp == generation.stamp() {
            Ok(())
        } else {
            Err(Error::StructuralChange)
        }
    }

    /// Fails unless the last call to `next` returned an entry that is still in place.
    #[inline]
    pub(crate) fn check_removable(&self, generation: &Generation) -> Result<(), Error> {
        self.check(generation)?;
        if self.state == CursorState::Iterating {
            Ok(())
        } else {
            Err(Error::NoCurrentEntry)
        }
    }

    #[inline]
    pub(crate) fn yielded(&mut self) {
        self.state = CursorState::Iterating;
    }

    #[inline]
    pub(crate) fn exhausted(&mut self) {
        self.state = CursorState::Exhausted;
    }

    /// Records a removal performed through the cursor; the container must already have bumped
    /// its generation.
    #[inline]
    pub(crate) fn removed(&mut self, generation: &Generation) {
        self.stamp = generation.stamp();
        self.state = CursorState::Removed;
    }
}

fn next_origin() -> u64 {
    static NEXT_ORIGIN: AtomicU64 = AtomicU64::new(0);
    NEXT_ORIGIN.fetch_add(1, Relaxed)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tracker_transitions() {
        let mut generation = Generation::new();
        let mut tracker = Tracker::new(&generation);
        assert_eq!(tracker.state(), CursorState::Created);
        assert_eq!(tracker.check_removable(&generation), Err(Error::NoCurrentEntry));

        tracker.yielded();
        assert!(tracker.check_removable(&generation).is_ok());
        generation.bump();
        tracker.removed(&generation);
        assert_eq!(tracker.state(), CursorState::Removed);
        assert!(tracker.check(&generation).is_ok());
        assert_eq!(tracker.check_removable(&generation), Err(Error::NoCurrentEntry));

        generation.bump();
        assert_eq!(tracker.check(&generation), Err(Error::StructuralChange));
    }

    #[test]
    fn clone_is_a_different_container() {
        let generation = Generation::new();
        let tracker = Tracker::new(&generation);
        let cloned = generation.clone();
        assert_eq!(tracker.check(&cloned), Err(Error::StructuralChange));
    }
}
