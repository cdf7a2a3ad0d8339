// SPDX-FileCopyrightText: The im-splaytree authors
// SPDX-License-Identifier: MPL-2.0

use thiserror::Error;

/// Failures of the explicit iterator protocol.
///
/// See [`SnapshotIter`](crate::SnapshotIter) and
/// [`UpdatingIter`](crate::UpdatingIter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IterError {
    /// No more keys to visit.
    #[error("no more elements")]
    Exhausted,

    /// The source tree has been modified since the last call to `has_next()`.
    ///
    /// Calling `has_next()` again resynchronizes the iterator.
    #[error("tree modified since the last call to has_next()")]
    ConcurrentModification,

    /// `remove()` without a preceding `next()`, or twice for the same key.
    #[error("remove() requires a preceding call to next()")]
    IllegalState,

    /// The iterator is read-only.
    #[error("remove() is not supported")]
    Unsupported,
}
