use std::path::{Path, PathBuf};

use futures_channel::mpsc::{self, UnboundedReceiver};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use snafu::{ResultExt, Snafu};
use tracing::{debug, info, trace, warn};

use crate::ext::WorkspacePathExt;

const GIT_DIR: &str = ".git";
const HEAD_FILE: &str = "HEAD";

/// What happened in the workspace, as far as the changed-file tree is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceChange {
    /// A file in the working tree was created, saved, renamed or removed
    FilesChanged,
    /// `.git/HEAD` moved, e.g. another branch was checked out
    HeadMoved,
}

/// Watches the workspace recursively and forwards relevant changes over a channel.
///
/// Everything under `.git` apart from `HEAD` is ignored, since running git itself
/// touches the index.
pub struct WorkspaceWatcher {
    _watcher: RecommendedWatcher,
    changes: UnboundedReceiver<WorkspaceChange>,
}

impl WorkspaceWatcher {
    pub fn new(workspace_root: &Path) -> Result<Self, WatchError> {
        let (sender, changes) = mpsc::unbounded();
        let root = workspace_root.to_path_buf();

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => {
                    let Some(change) = classify(&event, &root) else {
                        trace!("Ignoring fs event: {:?}", event);
                        return;
                    };
                    debug!("{:?} caused by {:?}", change, event.paths);
                    if let Err(send_err) = sender.unbounded_send(change) {
                        debug!("Watch loop has stopped: {}", send_err);
                    }
                }
                Err(err) => warn!("File watcher error: {}", err),
            }
        })
        .context(CreateWatcherSnafu)?;

        watcher
            .watch(workspace_root, RecursiveMode::Recursive)
            .context(WatchPathSnafu {
                path: workspace_root.best_effort_display(),
            })?;
        info!("Watching {}", workspace_root.best_effort_display());

        Ok(Self {
            _watcher: watcher,
            changes,
        })
    }

    pub fn changes(&mut self) -> &mut UnboundedReceiver<WorkspaceChange> {
        &mut self.changes
    }
}

/// Maps a raw file system event onto a workspace change.
pub fn classify(event: &Event, workspace_root: &Path) -> Option<WorkspaceChange> {
    if matches!(event.kind, EventKind::Access(_)) {
        return None;
    }

    let git_dir = workspace_root.join(GIT_DIR);
    let head = git_dir.join(HEAD_FILE);

    let mut change = None;
    for path in &event.paths {
        if *path == head {
            return Some(WorkspaceChange::HeadMoved);
        }
        if !path.starts_with(&git_dir) {
            change = Some(WorkspaceChange::FilesChanged);
        }
    }
    change
}

#[derive(Debug, Snafu)]
pub enum WatchError {
    #[snafu(display("Failed to create the file watcher"))]
    CreateWatcherError { source: notify::Error },
    #[snafu(display("Failed to watch {}", path))]
    WatchPathError { path: String, source: notify::Error },
}
