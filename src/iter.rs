// SPDX-FileCopyrightText: The im-splaytree authors
// SPDX-License-Identifier: MPL-2.0

use std::{cell::RefCell, fmt, iter::FusedIterator, sync::Arc};

use crate::{IterError, Node, SplayTree, Version};

/// In-order traversal over borrowed keys.
///
/// Does not restructure the tree.
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    // Nodes whose key and right subtree are yet to be visited.
    stack: Vec<&'a Node>,
}

impl<'a> Keys<'a> {
    pub(crate) fn new(top: Option<&'a Node>) -> Self {
        let mut keys = Self { stack: Vec::new() };
        keys.push_left_spine(top);
        keys
    }

    fn push_left_spine(&mut self, mut next: Option<&'a Node>) {
        while let Some(node) = next {
            self.stack.push(node);
            next = node.left().map(Arc::as_ref);
        }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right().map(Arc::as_ref));
        Some(node.key())
    }
}

impl FusedIterator for Keys<'_> {}

/// Iterator over a snapshot of a tree.
///
/// Visits all keys that have been present when the iterator was created
/// in ascending order, regardless of any subsequent modifications of the
/// source tree. Works on a private clone that shares all nodes with the
/// source tree and consumes it key by key.
///
/// The explicit protocol [`Self::has_next()`], [`Self::try_next()`] and
/// [`Self::remove()`] is available in addition to [`Iterator`].
#[derive(Debug, Clone)]
pub struct SnapshotIter {
    remaining: SplayTree,
}

impl SnapshotIter {
    pub(crate) fn new(source: &SplayTree) -> Self {
        let mut remaining = source.clone();
        remaining.splay_first();
        Self { remaining }
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        !self.remaining.is_empty()
    }

    /// Visit the next key.
    ///
    /// Fails with [`IterError::Exhausted`] if all keys have been visited.
    pub fn try_next(&mut self) -> Result<String, IterError> {
        let key = self.remaining.pop_first().ok_or(IterError::Exhausted)?;
        Ok(key.as_ref().to_owned())
    }

    /// Always fails with [`IterError::Unsupported`].
    ///
    /// The iterator is read-only.
    #[allow(clippy::unused_self)]
    pub fn remove(&mut self) -> Result<(), IterError> {
        Err(IterError::Unsupported)
    }
}

impl Iterator for SnapshotIter {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().ok()
    }
}

impl FusedIterator for SnapshotIter {}

/// Renders the keys that are yet to be visited.
impl fmt::Display for SnapshotIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.remaining, f)
    }
}

/// Iterator that follows the modifications of a shared tree.
///
/// Each call of [`Self::try_next()`] returns the least key that is
/// currently in the source tree and greater than the previously returned
/// key. The source tree is observed through a shared reference and never
/// restructured by the iterator. Only [`Self::remove()`] modifies it.
///
/// Modifications of the source tree are picked up by [`Self::has_next()`].
/// If the source tree has been modified since the last call to `has_next()`
/// by other means than this iterator then `try_next()` fails with
/// [`IterError::ConcurrentModification`].
///
/// The [`Iterator`] implementation invokes `has_next()` before each step
/// and never encounters this error.
///
/// All methods panic if the source tree is currently borrowed mutably.
/// [`Self::remove()`] also panics while any other borrow is alive.
#[derive(Debug)]
pub struct UpdatingIter<'a> {
    source: &'a RefCell<SplayTree>,

    /// Private working copy with all keys that are yet to be visited.
    remaining: SplayTree,

    /// The version of the source tree that `remaining` was derived from.
    synced_version: Version,

    last_returned: Option<Arc<str>>,

    /// Candidate for [`Self::remove()`].
    removable: Option<Arc<str>>,
}

impl<'a> UpdatingIter<'a> {
    /// Start iterating at the least key of the source tree.
    ///
    /// # Panics
    ///
    /// Panics if the source tree is currently borrowed mutably.
    #[must_use]
    pub fn new(source: &'a RefCell<SplayTree>) -> Self {
        let (mut remaining, synced_version) = {
            let source = source.borrow();
            (source.clone(), source.version())
        };
        remaining.splay_first();
        Self {
            source,
            remaining,
            synced_version,
            last_returned: None,
            removable: None,
        }
    }

    /// Check if there are more keys to visit.
    ///
    /// Resynchronizes the iterator with the source tree if it has
    /// been modified.
    pub fn has_next(&mut self) -> bool {
        self.sync();
        !self.remaining.is_empty()
    }

    /// Visit the next key.
    ///
    /// Fails with [`IterError::ConcurrentModification`] if the source tree
    /// has been modified since the last call to [`Self::has_next()`] and
    /// with [`IterError::Exhausted`] if all keys have been visited.
    pub fn try_next(&mut self) -> Result<String, IterError> {
        if self.source.borrow().version() != self.synced_version {
            return Err(IterError::ConcurrentModification);
        }
        let key = self.remaining.pop_first().ok_or(IterError::Exhausted)?;
        self.last_returned = Some(Arc::clone(&key));
        let next = key.as_ref().to_owned();
        self.removable = Some(key);
        Ok(next)
    }

    /// Delete the most recently visited key from the source tree.
    ///
    /// Fails with [`IterError::IllegalState`] if no key has been visited
    /// yet or if the key has already been removed.
    ///
    /// # Panics
    ///
    /// Panics if the source tree is currently borrowed, either mutably or
    /// immutably.
    pub fn remove(&mut self) -> Result<(), IterError> {
        let key = self.removable.take().ok_or(IterError::IllegalState)?;
        let mut source = self.source.borrow_mut();
        let in_sync = source.version() == self.synced_version;
        if !source.delete(&key) {
            log::debug!("Key {key:?} has already been removed from the source tree");
        }
        // The removed key has already been visited, i.e. our own
        // modification does not require to resynchronize.
        if in_sync {
            self.synced_version = source.version();
        }
        Ok(())
    }

    fn sync(&mut self) {
        let mut remaining = {
            let source = self.source.borrow();
            if source.version() == self.synced_version {
                return;
            }
            log::debug!(
                "Resynchronizing with source tree: version {synced_version} -> {version}",
                synced_version = self.synced_version,
                version = source.version(),
            );
            self.synced_version = source.version();
            source.clone()
        };
        if let Some(last_returned) = &self.last_returned {
            // The least string that is greater than the previously returned key
            let mut lower_bound = String::with_capacity(last_returned.len() + 1);
            lower_bound.push_str(last_returned);
            lower_bound.push('\0');
            remaining = remaining.tail_set(&lower_bound);
        }
        remaining.splay_first();
        self.remaining = remaining;
    }
}

impl Iterator for UpdatingIter<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        self.try_next().ok()
    }
}

/// Renders the keys that are yet to be visited.
impl fmt::Display for UpdatingIter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.remaining, f)
    }
}
