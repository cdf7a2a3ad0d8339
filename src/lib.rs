// SPDX-FileCopyrightText: The im-splaytree authors
// SPDX-License-Identifier: MPL-2.0

//! Persistent splay tree of strings with fast cloning and subset extraction.
//!
//! ```
//! use im_splaytree::SplayTree;
//!
//! let mut tree = SplayTree::new();
//! for key in ["hello", "world", "how", "are", "you"] {
//!     tree.insert(key);
//! }
//!
//! // Cloning shares the root node
//! let snapshot = tree.clone();
//! assert!(tree.delete("how"));
//! assert_eq!(4, tree.len());
//! assert_eq!(5, snapshot.len());
//!
//! let sub = tree.sub_set("are", "world");
//! assert_eq!(vec!["are", "hello"], sub.keys().collect::<Vec<_>>());
//! ```

mod error;
pub use self::error::IterError;

mod iter;
pub use self::iter::{Keys, SnapshotIter, UpdatingIter};

mod node;
pub use self::node::{Node, OptNode};

mod splay;
pub use self::splay::{splay, splay_max, splay_min};

mod tree;
pub use self::tree::SplayTree;

mod version;
pub use self::version::Version;
