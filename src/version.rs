// SPDX-FileCopyrightText: The im-splaytree authors
// SPDX-License-Identifier: MPL-2.0

/// Modification counter of a [`SplayTree`](crate::SplayTree).
///
/// Advanced on every structural change of a tree instance, i.e. when
/// a new key is inserted or an existing key is deleted. Versions are
/// only compared for equality to detect modifications. They carry no
/// ordering and are never shared between the nodes of a tree.
///
/// ```
/// # use im_splaytree::SplayTree;
/// let mut tree = SplayTree::new();
/// let before = tree.version();
/// assert!(tree.insert("foo"));
/// assert_ne!(before, tree.version());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, derive_more::Display)]
pub struct Version(u64);

impl Version {
    /// The version of a newly created, empty tree.
    pub const INITIAL: Self = Self(0);

    /// The version following this one.
    ///
    /// Wraps around on overflow, which is harmless for an equality check
    /// that is performed between consecutive modifications.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}
