use std::path::Path;

use crate::compactor::DisplayNode;
use crate::filesystem::{PATH_SEPARATOR, PathTree};

/// Emits the display nodes for the children of `node`, which sits at `relative_path`.
///
/// Chains of directories with a single child are folded into one node labelled with
/// the joined chain. A chain that ends on a file stops one level above it, so the file
/// still shows up as its own node when the compacted node is expanded.
pub fn emit_children<S: AsRef<str>>(
    workspace_root: &Path,
    node: &PathTree,
    relative_path: &[S],
) -> Vec<DisplayNode> {
    node.entries()
        .map(|(key, child)| {
            let num_children = child.child_count();

            if num_children != 1 {
                return DisplayNode::new(
                    workspace_root,
                    extend_path(relative_path, [key.clone()]),
                    key.clone(),
                    num_children > 0,
                );
            }

            let compact_path = compact_chain(key, child);
            let label = compact_path.join(PATH_SEPARATOR);
            DisplayNode::new(
                workspace_root,
                extend_path(relative_path, compact_path),
                label,
                true,
            )
        })
        .collect()
}

/// Walks down from `child` while every directory has exactly one entry.
fn compact_chain(key: &str, child: &PathTree) -> Vec<String> {
    let mut compact_path = vec![key.to_string()];
    let mut current = child;

    while let Some((child_key, next)) = current.single_child() {
        compact_path.push(child_key.clone());
        current = next;
    }

    // The file at the end of the chain gets its own node
    if current.is_file() {
        compact_path.pop();
    }

    compact_path
}

fn extend_path<S, I>(relative_path: &[S], tail: I) -> Vec<String>
where
    S: AsRef<str>,
    I: IntoIterator<Item = String>,
{
    relative_path
        .iter()
        .map(|segment| segment.as_ref().to_string())
        .chain(tail)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::{OverlapPolicy, parse_changed_paths};
    use rstest::*;

    const ROOT: &str = "/workspace";

    fn build(paths: &[&str]) -> PathTree {
        PathTree::build(parse_changed_paths(paths), OverlapPolicy::Reject).expect("tree builds")
    }

    fn root_nodes(tree: &PathTree) -> Vec<DisplayNode> {
        emit_children::<&str>(Path::new(ROOT), tree, &[])
    }

    fn children_of(tree: &PathTree, node: &DisplayNode) -> Vec<DisplayNode> {
        let position = tree
            .descend(node.relative_path())
            .expect("display node resolves in its own tree");
        emit_children(Path::new(ROOT), position, node.relative_path())
    }

    fn labels(nodes: &[DisplayNode]) -> Vec<(&str, bool)> {
        nodes
            .iter()
            .map(|node| (node.label(), node.is_expandable()))
            .collect()
    }

    #[test]
    fn single_chain_stops_above_the_file() {
        let tree = build(&["a/b/c.txt"]);
        let roots = root_nodes(&tree);
        assert_eq!(labels(&roots), vec![("a/b", true)]);
        assert_eq!(roots[0].relative_path(), ["a", "b"]);

        let children = children_of(&tree, &roots[0]);
        assert_eq!(labels(&children), vec![("c.txt", false)]);
        assert_eq!(children[0].relative_path(), ["a", "b", "c.txt"]);
    }

    #[test]
    fn branching_directory_is_not_compacted() {
        let tree = build(&["a/x.txt", "a/y.txt"]);
        let roots = root_nodes(&tree);
        assert_eq!(labels(&roots), vec![("a", true)]);

        let children = children_of(&tree, &roots[0]);
        assert_eq!(labels(&children), vec![("x.txt", false), ("y.txt", false)]);
    }

    #[test]
    fn empty_tree_emits_nothing() {
        let tree = build(&[]);
        assert!(root_nodes(&tree).is_empty());
    }

    #[test]
    fn mixed_files_and_directories() {
        let tree = build(&["a/b.txt", "a/c/d.txt"]);
        let roots = root_nodes(&tree);
        assert_eq!(labels(&roots), vec![("a", true)]);

        let children = children_of(&tree, &roots[0]);
        assert_eq!(labels(&children), vec![("b.txt", false), ("c", true)]);

        let grandchildren = children_of(&tree, &children[1]);
        assert_eq!(labels(&grandchildren), vec![("d.txt", false)]);
    }

    #[test]
    fn chain_ending_in_branching_directory_keeps_it() {
        let tree = build(&["src/docs/unit1/a.md", "src/docs/unit1/b.md"]);
        let roots = root_nodes(&tree);
        assert_eq!(labels(&roots), vec![("src/docs/unit1", true)]);
        assert_eq!(roots[0].relative_path(), ["src", "docs", "unit1"]);

        let children = children_of(&tree, &roots[0]);
        assert_eq!(labels(&children), vec![("a.md", false), ("b.md", false)]);
    }

    #[test]
    fn compaction_inside_nested_directory() {
        let tree = build(&["top.txt", "lib/core/src/x.rs", "lib/core/src/y.rs", "lib/ui.rs"]);
        let roots = root_nodes(&tree);
        assert_eq!(labels(&roots), vec![("top.txt", false), ("lib", true)]);

        let children = children_of(&tree, &roots[1]);
        assert_eq!(labels(&children), vec![("core/src", true), ("ui.rs", false)]);
        assert_eq!(children[0].relative_path(), ["lib", "core", "src"]);
    }

    #[test]
    fn file_nodes_have_no_children() {
        let tree = build(&["a.txt"]);
        let roots = root_nodes(&tree);
        assert!(children_of(&tree, &roots[0]).is_empty());
    }

    #[test]
    fn absolute_path_joins_workspace_root() {
        let tree = build(&["a/b/c.txt"]);
        let roots = root_nodes(&tree);
        let file = &children_of(&tree, &roots[0])[0];
        assert_eq!(file.absolute_path(), Path::new("/workspace/a/b/c.txt"));
    }

    #[rstest]
    #[case(&["a/b/c.txt"])]
    #[case(&["a/x.txt", "a/y.txt"])]
    #[case(&["a/b.txt", "a/c/d.txt"])]
    #[case(&["one/two/three/four.txt", "one/two/five.txt", "six/seven.txt", "eight.txt"])]
    #[case(&["deep/a/b/c/d/e.txt", "deep/a/b/c/f.txt", "deep/g.txt"])]
    fn every_node_round_trips_to_its_tree_position(#[case] paths: &[&str]) {
        let tree = build(paths);
        let mut pending = root_nodes(&tree);
        let mut visited_files = Vec::new();

        while let Some(node) = pending.pop() {
            let position = tree
                .descend(node.relative_path())
                .expect("relative path resolves");
            assert_eq!(node.is_expandable(), !position.is_file());
            if position.is_file() {
                visited_files.push(node.relative_path().join("/"));
            }
            pending.extend(emit_children(Path::new(ROOT), position, node.relative_path()));
        }

        let mut expected = paths.iter().map(|p| p.to_string()).collect::<Vec<_>>();
        expected.sort();
        visited_files.sort();
        assert_eq!(visited_files, expected);
    }

    #[test]
    fn emission_follows_insertion_order() {
        let tree = build(&["zeta.txt", "alpha/one.txt", "alpha/two.txt", "mid.txt"]);
        let roots = root_nodes(&tree);
        assert_eq!(
            labels(&roots),
            vec![("zeta.txt", false), ("alpha", true), ("mid.txt", false)]
        );
    }
}
