use std::path::Path;

use tracing::debug;

use crate::compactor::{DisplayNode, emit_children};
use crate::filesystem::{PATH_SEPARATOR, PathTree};
use crate::source::ReferencePoint;

/// One generation of the changed-file tree.
///
/// Snapshots are immutable; a refresh builds a new one and swaps it in whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    generation: u64,
    reference: ReferencePoint,
    tree: PathTree,
}

impl TreeSnapshot {
    pub fn new(generation: u64, reference: ReferencePoint, tree: PathTree) -> Self {
        Self {
            generation,
            reference,
            tree,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reference(&self) -> &ReferencePoint {
        &self.reference
    }

    /// Emits the children of the node at `relative_path`.
    ///
    /// A path that does not resolve in this generation, usually a node kept across a
    /// refresh, has no children.
    pub fn children<S: AsRef<str>>(
        &self,
        workspace_root: &Path,
        relative_path: &[S],
    ) -> Vec<DisplayNode> {
        match self.tree.descend(relative_path) {
            Some(position) => emit_children(workspace_root, position, relative_path),
            None => {
                debug!(
                    "Node '{}' does not exist in tree generation {}",
                    relative_path
                        .iter()
                        .map(AsRef::as_ref)
                        .collect::<Vec<_>>()
                        .join(PATH_SEPARATOR),
                    self.generation
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::{OverlapPolicy, parse_changed_paths};

    fn snapshot(paths: &[&str]) -> TreeSnapshot {
        let tree = PathTree::build(parse_changed_paths(paths), OverlapPolicy::Reject).unwrap();
        TreeSnapshot::new(1, ReferencePoint::new("main"), tree)
    }

    #[test]
    fn unresolved_paths_have_no_children() {
        let snapshot = snapshot(&["a/b.txt"]);
        let root = Path::new("/repo");
        assert!(snapshot.children(root, &["gone"]).is_empty());
        assert!(snapshot.children(root, &["a", "b.txt", "c"]).is_empty());
    }

    #[test]
    fn root_and_nested_queries_resolve() {
        let snapshot = snapshot(&["a/b.txt", "a/c/d.txt"]);
        let root = Path::new("/repo");

        let top = snapshot.children::<&str>(root, &[]);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].label(), "a");

        let nested = snapshot.children(root, top[0].relative_path());
        let labels = nested.iter().map(DisplayNode::label).collect::<Vec<_>>();
        assert_eq!(labels, vec!["b.txt", "c"]);
    }
}
