use std::path::{Path, PathBuf};

use crate::ext::WorkspacePathExt;

/// A node handed to the display.
///
/// `relative_path` is the only stable key for asking for this node's children later.
/// The label is for display only and may combine several compacted directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNode {
    workspace_root: PathBuf,
    relative_path: Vec<String>,
    label: String,
    expandable: bool,
}

impl DisplayNode {
    pub fn new(
        workspace_root: &Path,
        relative_path: Vec<String>,
        label: String,
        expandable: bool,
    ) -> Self {
        Self {
            workspace_root: workspace_root.to_path_buf(),
            relative_path,
            label,
            expandable,
        }
    }

    pub fn relative_path(&self) -> &[String] {
        &self.relative_path
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_expandable(&self) -> bool {
        self.expandable
    }

    /// Location of the node on disk, which is what opening a file node targets.
    pub fn absolute_path(&self) -> PathBuf {
        self.workspace_root.join_segments(&self.relative_path)
    }
}
