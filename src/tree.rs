// SPDX-FileCopyrightText: The im-splaytree authors
// SPDX-License-Identifier: MPL-2.0

use std::{cell::RefCell, cmp::Ordering, fmt, sync::Arc};

use crate::{
    node::node, splay, splay_max, splay_min, Keys, Node, OptNode, SnapshotIter, UpdatingIter,
    Version,
};

/// Ordered set of strings, stored as a persistent splay tree.
///
/// The tree itself is only a mutable handle to the current version:
/// a reference to an immutable root [`Node`] and a modification counter.
/// All nodes are shared between trees. Cloning a tree is O(1) and
/// extracting a range only allocates the nodes along a single search path.
///
/// Every lookup restructures the tree by splaying on the requested key.
/// That is why even read-only queries like [`Self::contains()`] require
/// a mutable reference.
///
/// Could be shared safely between multiple threads, but must not be
/// modified concurrently.
#[derive(Debug, Clone, Default)]
pub struct SplayTree {
    top: OptNode,
    version: Version,
}

impl SplayTree {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            top: None,
            version: Version::INITIAL,
        }
    }

    /// Create a tree from an existing root node.
    ///
    /// The nodes are shared, not copied.
    #[must_use]
    pub const fn from_root(top: OptNode) -> Self {
        Self {
            top,
            version: Version::INITIAL,
        }
    }

    /// Create a balanced tree from keys in strictly ascending order.
    ///
    /// Returns `None` if the keys are not strictly ascending.
    #[must_use]
    pub fn from_sorted_keys<K: AsRef<str>>(keys: &[K]) -> Option<Self> {
        if !keys
            .windows(2)
            .all(|pair| pair[0].as_ref() < pair[1].as_ref())
        {
            return None;
        }
        Some(Self::from_root(build_balanced(keys)))
    }

    /// The root node of the current version.
    #[must_use]
    pub const fn root(&self) -> Option<&Arc<Node>> {
        self.top.as_ref()
    }

    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// Number of keys.
    ///
    /// Counts all nodes without restructuring the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.top.as_ref().map_or(0, |top| top.count())
    }

    /// All keys in ascending order.
    ///
    /// Unlike all other queries the traversal does not restructure the tree.
    #[must_use]
    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self.top.as_deref())
    }

    /// Insert a key.
    ///
    /// Returns `true` if the key has been added and `false` if it
    /// was already present. The tree is left unchanged in the latter case.
    /// A newly inserted key becomes the root.
    pub fn insert(&mut self, key: &str) -> bool {
        let Some(top) = &self.top else {
            log::debug!("Inserting {key:?} into empty tree");
            self.top = Some(Arc::new(Node::leaf(key)));
            self.version = self.version.next();
            return true;
        };
        let splayed = splay(top, key);
        // No other key lies between the splayed root and the new key.
        // The new key is spliced into that gap as the new root.
        let new_top = match key.cmp(splayed.key()) {
            Ordering::Equal => {
                log::debug!("Key {key:?} is already present");
                return false;
            }
            Ordering::Less => Node::new(
                key,
                splayed.left().cloned(),
                Some(node(splayed.shared_key(), None, splayed.right().cloned())),
            ),
            Ordering::Greater => Node::new(
                key,
                Some(node(splayed.shared_key(), splayed.left().cloned(), None)),
                splayed.right().cloned(),
            ),
        };
        log::debug!(
            "Inserted {key:?} next to {neighbor:?}",
            neighbor = splayed.key()
        );
        self.top = Some(Arc::new(new_top));
        self.version = self.version.next();
        true
    }

    /// Delete a key.
    ///
    /// Returns `true` if the key has been removed and `false` if it
    /// was not present. If the key is not present the tree is still
    /// splayed on it.
    pub fn delete(&mut self, key: &str) -> bool {
        let Some(top) = &self.top else {
            return false;
        };
        let splayed = splay(top, key);
        if splayed.key() != key {
            log::debug!("Key {key:?} is not present");
            self.top = Some(splayed);
            return false;
        }
        self.top = match (splayed.left(), splayed.right()) {
            (None, right) => right.cloned(),
            (left, None) => left.cloned(),
            (Some(left), Some(right)) => {
                // The predecessor of the deleted key has no right child
                // after splaying and replaces the deleted root.
                let predecessor = splay_max(left);
                debug_assert!(predecessor.right().is_none());
                Some(node(
                    predecessor.shared_key(),
                    predecessor.left().cloned(),
                    Some(Arc::clone(right)),
                ))
            }
        };
        log::debug!("Deleted {key:?}");
        self.version = self.version.next();
        true
    }

    /// Check if a key is present.
    ///
    /// Splays the tree on the key, no matter if it is found or not.
    pub fn contains(&mut self, key: &str) -> bool {
        self.splay_top(key)
            .map_or(false, |top| top.key() == key)
    }

    /// The least key.
    ///
    /// Splays the least key to the root.
    pub fn first(&mut self) -> Option<&str> {
        let top = self.top.as_ref().map(splay_min)?;
        Some(self.top.insert(top).key())
    }

    /// The greatest key.
    ///
    /// Splays the greatest key to the root.
    pub fn last(&mut self) -> Option<&str> {
        let top = self.top.as_ref().map(splay_max)?;
        Some(self.top.insert(top).key())
    }

    /// Extract all keys that are less than `key`.
    ///
    /// Splays this tree on `key` as a side effect. The extracted tree
    /// shares all its nodes with this tree except for at most one.
    pub fn head_set(&mut self, key: &str) -> Self {
        let mut head = self.clone();
        let Some(splayed) = self.splay_top(key).cloned() else {
            return head;
        };
        head.top = match splayed.key().cmp(key) {
            Ordering::Less if splayed.right().is_none() => Some(splayed),
            Ordering::Less => Some(node(
                splayed.shared_key(),
                splayed.left().cloned(),
                None,
            )),
            // No key of the tree lies in between, i.e. all keys of the
            // left subtree are less than the requested key.
            Ordering::Equal | Ordering::Greater => splayed.left().cloned(),
        };
        log::debug!(
            "Extracted head set below {key:?} at {root:?}",
            root = head.top.as_ref().map(|top| top.key())
        );
        head
    }

    /// Extract all keys that are greater than or equal to `key`.
    ///
    /// Splays this tree on `key` as a side effect. The extracted tree
    /// shares all its nodes with this tree except for at most one.
    pub fn tail_set(&mut self, key: &str) -> Self {
        let mut tail = self.clone();
        let Some(splayed) = self.splay_top(key).cloned() else {
            return tail;
        };
        tail.top = match splayed.key().cmp(key) {
            Ordering::Less => splayed.right().cloned(),
            Ordering::Equal | Ordering::Greater if splayed.left().is_none() => Some(splayed),
            Ordering::Equal | Ordering::Greater => Some(node(
                splayed.shared_key(),
                None,
                splayed.right().cloned(),
            )),
        };
        log::debug!(
            "Extracted tail set from {key:?} at {root:?}",
            root = tail.top.as_ref().map(|top| top.key())
        );
        tail
    }

    /// Extract all keys in the half-open range `[from, to)`.
    ///
    /// Splays this tree on `to` as a side effect.
    pub fn sub_set(&mut self, from: &str, to: &str) -> Self {
        self.head_set(to).tail_set(from)
    }

    /// Iterate over a snapshot of the current keys in ascending order.
    ///
    /// Subsequent modifications of this tree are not visible to
    /// the iterator. This tree is not restructured.
    #[must_use]
    pub fn snapshot_iter(&self) -> SnapshotIter {
        SnapshotIter::new(self)
    }

    /// Iterate over the keys of a shared tree in ascending order.
    ///
    /// Modifications of the tree are visible to the iterator and keys
    /// can be removed through the iterator. See [`UpdatingIter`].
    ///
    /// # Panics
    ///
    /// Panics if the tree is currently borrowed mutably.
    #[must_use]
    pub fn updating_iter(tree: &RefCell<Self>) -> UpdatingIter<'_> {
        UpdatingIter::new(tree)
    }

    /// Splay the current version on `key` and return the new root.
    fn splay_top(&mut self, key: &str) -> Option<&Arc<Node>> {
        let top = self.top.as_ref().map(|top| splay(top, key))?;
        Some(&*self.top.insert(top))
    }

    /// Remove and return the least key.
    ///
    /// Afterwards the least of the remaining keys is at the root.
    pub(crate) fn pop_first(&mut self) -> Option<Arc<str>> {
        let first = self.top.as_ref().map(splay_min)?;
        debug_assert!(first.left().is_none());
        self.top = first.right().map(splay_min);
        self.version = self.version.next();
        Some(Arc::clone(first.shared_key()))
    }

    /// Bring the least key to the root.
    pub(crate) fn splay_first(&mut self) {
        self.top = self.top.as_ref().map(splay_min);
    }
}

fn build_balanced<K: AsRef<str>>(keys: &[K]) -> OptNode {
    if keys.is_empty() {
        return None;
    }
    let mid = keys.len() / 2;
    Some(Arc::new(Node::new(
        keys[mid].as_ref(),
        build_balanced(&keys[..mid]),
        build_balanced(&keys[mid + 1..]),
    )))
}

/// Sideways rendering of the tree structure.
///
/// The root is written at the left, the left subtree above and the
/// right subtree below it. An empty tree is written as `[]`.
impl fmt::Display for SplayTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(top) = &self.top else {
            return writeln!(f, "[]");
        };
        top.write_tree(f, "", "   ", "   ", " -")
    }
}

/// Trees are equal if they contain the same keys.
///
/// The shape of the trees and their versions are irrelevant.
impl PartialEq for SplayTree {
    fn eq(&self, other: &Self) -> bool {
        self.keys().eq(other.keys())
    }
}

impl Eq for SplayTree {}

/// Collects all keys into a balanced tree.
impl<K: AsRef<str>> FromIterator<K> for SplayTree {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut keys = iter.into_iter().collect::<Vec<_>>();
        keys.sort_unstable_by(|lhs, rhs| lhs.as_ref().cmp(rhs.as_ref()));
        keys.dedup_by(|lhs, rhs| lhs.as_ref() == rhs.as_ref());
        Self::from_root(build_balanced(&keys))
    }
}

/// Inserts the keys one after another.
impl<K: AsRef<str>> Extend<K> for SplayTree {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key.as_ref());
        }
    }
}

#[cfg(feature = "im")]
impl From<&SplayTree> for im::OrdSet<String> {
    fn from(tree: &SplayTree) -> Self {
        tree.keys().map(ToOwned::to_owned).collect()
    }
}

#[cfg(feature = "im")]
impl From<&im::OrdSet<String>> for SplayTree {
    fn from(set: &im::OrdSet<String>) -> Self {
        // Already sorted and free of duplicates.
        let keys = set.iter().collect::<Vec<_>>();
        Self::from_root(build_balanced(&keys))
    }
}
