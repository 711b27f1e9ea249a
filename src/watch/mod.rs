//! Keeps the rendered tree up to date while the workspace changes.

mod watch_session;
mod workspace_watcher;

pub use watch_session::watch_tree;
pub use workspace_watcher::{WatchError, WorkspaceChange, WorkspaceWatcher};
