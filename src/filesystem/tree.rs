use hashlink::LinkedHashMap;
use hashlink::linked_hash_map::Entry;
use snafu::{Snafu, location};
use tracing::{debug, error, warn};

use crate::filesystem::ChangedPath;

/// What to do with a path that is also a prefix of another reported path,
/// e.g. both `a` and `a/b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Warn and drop the conflicting path, keeping everything inserted so far
    #[default]
    Skip,
    /// Fail the whole build
    Reject,
}

impl OverlapPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "skip" => Some(OverlapPolicy::Skip),
            "reject" => Some(OverlapPolicy::Reject),
            _ => None,
        }
    }
}

/// Directory tree of the changed files.
///
/// Children keep their insertion order, which is the order emitted to the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathTree {
    File,
    Directory {
        children: LinkedHashMap<String, PathTree>,
    },
}

impl PathTree {
    pub fn root() -> Self {
        PathTree::Directory {
            children: LinkedHashMap::new(),
        }
    }

    /// Builds a fresh tree from the whole set of changed paths.
    pub fn build<I>(paths: I, overlap: OverlapPolicy) -> Result<Self, TreeBuildError>
    where
        I: IntoIterator<Item = ChangedPath>,
    {
        let mut root = Self::root();
        let mut inserted = 0usize;

        for path in paths {
            match root.try_insert_path(&path) {
                Ok(()) => inserted += 1,
                Err(err) => match overlap {
                    OverlapPolicy::Skip => {
                        warn!("Skipping changed path: {}", err);
                    }
                    OverlapPolicy::Reject => {
                        return Err(TreeBuildError::OverlappingPaths { source: err });
                    }
                },
            }
        }

        debug!("Built changed-file tree from {} paths", inserted);
        Ok(root)
    }

    /// Inserts a single path, creating missing directories on the way down.
    ///
    /// Inserting a path that already exists as a file is a no-op.
    pub fn try_insert_path(&mut self, path: &ChangedPath) -> Result<(), OverlappingPathError> {
        let Some(last) = path.len().checked_sub(1) else {
            error!(
                "Assumption that changed paths are never empty failed {}",
                location!()
            );
            return Ok(());
        };
        let mut current = self;

        for (index, segment) in path.iter().enumerate() {
            let children = match current {
                PathTree::Directory { children } => children,
                PathTree::File => {
                    return Err(OverlappingPathError {
                        path: path.to_string(),
                        conflicting: path.prefix(index),
                    });
                }
            };

            let is_leaf = index == last;
            // `or_insert_with` would move an existing key to the back
            let entry = match children.entry(segment.clone()) {
                Entry::Occupied(occupied) => occupied.into_mut(),
                Entry::Vacant(vacant) => vacant.insert(if is_leaf {
                    PathTree::File
                } else {
                    PathTree::root()
                }),
            };

            if is_leaf && !entry.is_file() {
                return Err(OverlappingPathError {
                    path: path.to_string(),
                    conflicting: path.to_string(),
                });
            }
            current = entry;
        }

        Ok(())
    }

    pub fn is_file(&self) -> bool {
        matches!(self, PathTree::File)
    }

    pub fn child_count(&self) -> usize {
        match self {
            PathTree::File => 0,
            PathTree::Directory { children } => children.len(),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &PathTree)> {
        let children = match self {
            PathTree::File => None,
            PathTree::Directory { children } => Some(children),
        };
        children.into_iter().flat_map(|children| children.iter())
    }

    /// The only child of a directory that has exactly one.
    pub fn single_child(&self) -> Option<(&String, &PathTree)> {
        match self {
            PathTree::Directory { children } if children.len() == 1 => children.iter().next(),
            _ => None,
        }
    }

    /// Follows `segments` from this node using plain key lookups.
    pub fn descend<S: AsRef<str>>(&self, segments: &[S]) -> Option<&PathTree> {
        segments
            .iter()
            .try_fold(self, |node, segment| match node {
                PathTree::Directory { children } => children.get(segment.as_ref()),
                PathTree::File => None,
            })
    }
}

#[derive(Debug, Snafu)]
#[snafu(display(
    "'{}' overlaps with '{}', which is reported as both a file and a directory",
    path,
    conflicting
))]
pub struct OverlappingPathError {
    pub path: String,
    pub conflicting: String,
}

#[derive(Debug, Snafu)]
pub enum TreeBuildError {
    #[snafu(display("Changed paths cannot be arranged into a tree"))]
    OverlappingPaths { source: OverlappingPathError },
}
