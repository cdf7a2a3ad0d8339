// SPDX-FileCopyrightText: The im-splaytree authors
// SPDX-License-Identifier: MPL-2.0

use std::{fmt, sync::Arc};

/// Optional, shared reference to a [`Node`].
///
/// `None` denotes an empty (sub)tree.
pub type OptNode = Option<Arc<Node>>;

/// Immutable cell of a splay tree.
///
/// All keys in the left subtree are less than the key of the node and
/// all keys in the right subtree are greater. A node is never modified
/// after construction and may be shared by any number of trees.
pub struct Node {
    key: Arc<str>,
    left: OptNode,
    right: OptNode,
}

impl Node {
    /// Construct a new node.
    ///
    /// The caller is responsible for the ordering of the children.
    #[must_use]
    pub fn new(key: impl Into<Arc<str>>, left: OptNode, right: OptNode) -> Self {
        let node = Self {
            key: key.into(),
            left,
            right,
        };
        debug_assert!(node
            .left
            .as_ref()
            .map_or(true, |left| *left.key < *node.key));
        debug_assert!(node
            .right
            .as_ref()
            .map_or(true, |right| *node.key < *right.key));
        node
    }

    /// Construct a node without children.
    #[must_use]
    pub fn leaf(key: impl Into<Arc<str>>) -> Self {
        Self::new(key, None, None)
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The shared key, for building new nodes without copying the text.
    #[must_use]
    pub(crate) const fn shared_key(&self) -> &Arc<str> {
        &self.key
    }

    #[must_use]
    pub const fn left(&self) -> Option<&Arc<Self>> {
        self.left.as_ref()
    }

    #[must_use]
    pub const fn right(&self) -> Option<&Arc<Self>> {
        self.right.as_ref()
    }

    /// Number of nodes in the subtree rooted at this node.
    #[must_use]
    pub fn count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.left.as_deref());
            pending.extend(node.right.as_deref());
        }
        count
    }

    /// Render the subtree sideways: left subtree above, right subtree below.
    ///
    /// `prefix` is written in front of this node's own line, `left_prefix`
    /// and `right_prefix` in front of every line of the respective subtree.
    /// `connector` precedes the key.
    pub(crate) fn write_tree(
        &self,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        left_prefix: &str,
        right_prefix: &str,
        connector: &'static str,
    ) -> fmt::Result {
        let mut pending = vec![Render::Subtree {
            node: self,
            prefix: prefix.to_owned(),
            left_prefix: left_prefix.to_owned(),
            right_prefix: right_prefix.to_owned(),
            connector,
        }];
        while let Some(render) = pending.pop() {
            match render {
                Render::Line {
                    node,
                    prefix,
                    connector,
                } => {
                    writeln!(f, "{prefix}{connector}{key}", key = node.key)?;
                }
                Render::Subtree {
                    node,
                    prefix,
                    left_prefix,
                    right_prefix,
                    connector,
                } => {
                    // Pushed in reverse order of output
                    if let Some(right) = node.right.as_deref() {
                        pending.push(Render::Subtree {
                            node: right,
                            prefix: right_prefix.clone(),
                            left_prefix: format!("{right_prefix} | "),
                            right_prefix: format!("{right_prefix}   "),
                            connector: " \\-",
                        });
                    }
                    pending.push(Render::Line {
                        node,
                        prefix,
                        connector,
                    });
                    if let Some(left) = node.left.as_deref() {
                        pending.push(Render::Subtree {
                            node: left,
                            prefix: left_prefix.clone(),
                            left_prefix: format!("{left_prefix}   "),
                            right_prefix: format!("{left_prefix} | "),
                            connector: " /-",
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Pending output of [`Node::write_tree()`].
enum Render<'a> {
    Line {
        node: &'a Node,
        prefix: String,
        connector: &'static str,
    },
    Subtree {
        node: &'a Node,
        prefix: String,
        left_prefix: String,
        right_prefix: String,
        connector: &'static str,
    },
}

/// Only the keys of the children are shown.
impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("left", &self.left.as_deref().map(Self::key))
            .field("right", &self.right.as_deref().map(Self::key))
            .finish()
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        // Unlink uniquely owned descendants one by one. Dropping them
        // recursively would exhaust the stack for degenerate trees.
        let mut pending = Vec::new();
        pending.extend(self.left.take());
        pending.extend(self.right.take());
        while let Some(child) = pending.pop() {
            if let Ok(mut child) = Arc::try_unwrap(child) {
                pending.extend(child.left.take());
                pending.extend(child.right.take());
            }
        }
    }
}

/// Shorthand for allocating a new shared node.
pub(crate) fn node(key: &Arc<str>, left: OptNode, right: OptNode) -> Arc<Node> {
    Arc::new(Node::new(Arc::clone(key), left, right))
}
