// SPDX-FileCopyrightText: The im-splaytree authors
// SPDX-License-Identifier: MPL-2.0

//! Top-down, path-copying splay.
//!
//! Splaying never modifies a node. Only the nodes along the search path
//! are replaced by new ones, every other subtree is shared with the input.

use std::{cmp::Ordering, sync::Arc};

use crate::node::{node, Node};

/// Splay the subtree rooted at `root` on `key`.
///
/// Returns a new subtree with the same keys whose root is the key
/// nearest to `key`: equal to `key` if present, otherwise a key with
/// no other key of the subtree in between. If `key` lies between two
/// keys then either of them may become the root, depending on the
/// direction of the final descent.
#[must_use]
pub fn splay(root: &Arc<Node>, key: &str) -> Arc<Node> {
    splay_by(root, &|node_key: &str| key.cmp(node_key))
}

/// Splay the least key of the subtree to its root.
#[must_use]
pub fn splay_min(root: &Arc<Node>) -> Arc<Node> {
    splay_by(root, &|_: &str| Ordering::Less)
}

/// Splay the greatest key of the subtree to its root.
///
/// The resulting root has no right child.
#[must_use]
pub fn splay_max(root: &Arc<Node>) -> Arc<Node> {
    splay_by(root, &|_: &str| Ordering::Greater)
}

/// A double rotation on the search path, waiting for the result of
/// splaying the grandchild subtree.
#[derive(Debug, Clone, Copy)]
enum Step<'a> {
    LeftZigZig { root: &'a Arc<Node>, child: &'a Arc<Node> },
    LeftZigZag { root: &'a Arc<Node>, child: &'a Arc<Node> },
    RightZigZig { root: &'a Arc<Node>, child: &'a Arc<Node> },
    RightZigZag { root: &'a Arc<Node>, child: &'a Arc<Node> },
}

impl Step<'_> {
    /// Reassemble the subtree around the splayed grandchild.
    fn apply(self, grandchild: &Arc<Node>) -> Arc<Node> {
        match self {
            Self::LeftZigZig { root, child } => {
                log::trace!("Left zig-zig at {key}", key = root.key());
                let demoted = node(
                    root.shared_key(),
                    child.right().cloned(),
                    root.right().cloned(),
                );
                let demoted = node(
                    child.shared_key(),
                    grandchild.right().cloned(),
                    Some(demoted),
                );
                node(
                    grandchild.shared_key(),
                    grandchild.left().cloned(),
                    Some(demoted),
                )
            }
            Self::LeftZigZag { root, child } => {
                log::trace!("Left zig-zag at {key}", key = root.key());
                let parent = node(
                    child.shared_key(),
                    child.left().cloned(),
                    grandchild.left().cloned(),
                );
                let grandparent = node(
                    root.shared_key(),
                    grandchild.right().cloned(),
                    root.right().cloned(),
                );
                node(grandchild.shared_key(), Some(parent), Some(grandparent))
            }
            Self::RightZigZig { root, child } => {
                log::trace!("Right zig-zig at {key}", key = root.key());
                let demoted = node(
                    root.shared_key(),
                    root.left().cloned(),
                    child.left().cloned(),
                );
                let demoted = node(
                    child.shared_key(),
                    Some(demoted),
                    grandchild.left().cloned(),
                );
                node(
                    grandchild.shared_key(),
                    Some(demoted),
                    grandchild.right().cloned(),
                )
            }
            Self::RightZigZag { root, child } => {
                log::trace!("Right zig-zag at {key}", key = root.key());
                let parent = node(
                    child.shared_key(),
                    grandchild.right().cloned(),
                    child.right().cloned(),
                );
                let grandparent = node(
                    root.shared_key(),
                    root.left().cloned(),
                    grandchild.left().cloned(),
                );
                node(grandchild.shared_key(), Some(grandparent), Some(parent))
            }
        }
    }
}

/// Splay towards a target that is described by its ordering relative
/// to the key of a node.
///
/// `target` returns `Less` if the target is below the given key, `Greater`
/// if it is above, and `Equal` if the key is the target itself.
///
/// The search path is descended two levels at a time while recording the
/// pending double rotations. They are applied bottom-up afterwards. The
/// stack depth does not depend on the height of the tree.
fn splay_by<F>(root: &Arc<Node>, target: &F) -> Arc<Node>
where
    F: Fn(&str) -> Ordering,
{
    let mut steps = Vec::new();
    let mut current = root;
    let mut splayed = loop {
        match target(current.key()) {
            Ordering::Less => {
                let Some(child) = current.left() else {
                    break Arc::clone(current);
                };
                match (target(child.key()), child.left(), child.right()) {
                    (Ordering::Less, Some(grandchild), _) => {
                        steps.push(Step::LeftZigZig {
                            root: current,
                            child,
                        });
                        current = grandchild;
                    }
                    (Ordering::Greater, _, Some(grandchild)) => {
                        steps.push(Step::LeftZigZag {
                            root: current,
                            child,
                        });
                        current = grandchild;
                    }
                    _ => {
                        log::trace!("Left zig at {key}", key = current.key());
                        let demoted = node(
                            current.shared_key(),
                            child.right().cloned(),
                            current.right().cloned(),
                        );
                        break node(child.shared_key(), child.left().cloned(), Some(demoted));
                    }
                }
            }
            Ordering::Greater => {
                let Some(child) = current.right() else {
                    break Arc::clone(current);
                };
                match (target(child.key()), child.left(), child.right()) {
                    (Ordering::Greater, _, Some(grandchild)) => {
                        steps.push(Step::RightZigZig {
                            root: current,
                            child,
                        });
                        current = grandchild;
                    }
                    (Ordering::Less, Some(grandchild), _) => {
                        steps.push(Step::RightZigZag {
                            root: current,
                            child,
                        });
                        current = grandchild;
                    }
                    _ => {
                        log::trace!("Right zig at {key}", key = current.key());
                        let demoted = node(
                            current.shared_key(),
                            current.left().cloned(),
                            child.left().cloned(),
                        );
                        break node(child.shared_key(), Some(demoted), child.right().cloned());
                    }
                }
            }
            Ordering::Equal => break Arc::clone(current),
        }
    };
    while let Some(step) = steps.pop() {
        splayed = step.apply(&splayed);
    }
    splayed
}
