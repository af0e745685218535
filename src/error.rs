//! [`Error`] types.

/// Errors surfaced by container operations.
///
/// A missing key is never an error: lookups and removals return `None` instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The key cannot be ordered against the keys of a tree-backed container.
    #[error("the key cannot be ordered against the keys in the container")]
    IncomparableKey,

    /// Tree-backed containers do not accept the null key.
    #[error("tree-backed containers do not accept the null key")]
    NullKeyRejected,

    /// The container was structurally modified after the cursor took its snapshot, or the
    /// cursor was driven against a container other than the one that created it.
    #[error("structural change detected")]
    StructuralChange,

    /// The cursor has no current entry to remove.
    #[error("the cursor has no current entry")]
    NoCurrentEntry,

    /// The key lies outside the bounds of a range view.
    #[error("the key lies outside the bounds of the range view")]
    KeyOutOfRange,

    /// A [`Config`](crate::Config) value was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
