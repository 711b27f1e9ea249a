//! Tree representation of the changed files.
//!
//! Paths reported by the path source are split into segments and folded into
//! a [`PathTree`], where a node is either a file or a directory holding its
//! children in insertion order.

mod changed_path;
mod tree;

pub use changed_path::{ChangedPath, PATH_SEPARATOR, parse_changed_paths};
pub use tree::{OverlapPolicy, PathTree, TreeBuildError};
