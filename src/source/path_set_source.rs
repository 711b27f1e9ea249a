use snafu::Snafu;

use crate::source::ReferencePoint;

/// Supplies the changed paths and reference points the tree is built from.
pub trait PathSetSource {
    /// Lists `/`-separated paths that differ from `reference`, one entry per file.
    async fn list_changed_paths(
        &self,
        reference: &ReferencePoint,
    ) -> Result<Vec<String>, SourceError>;

    /// Best-effort guess of the branch the current one is compared against.
    /// An empty string means detection was inconclusive.
    async fn detect_default_reference(&self) -> Result<String, SourceError>;

    /// Lists selectable reference points; the current branch is prefixed with `* `.
    async fn list_reference_points(&self) -> Result<Vec<String>, SourceError>;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SourceError {
    #[snafu(display("Failed to spawn '{}' in {}", command, workspace))]
    SpawnError {
        command: String,
        workspace: String,
        source: std::io::Error,
    },
    #[snafu(display("Command '{}' failed with exit code {}: {}", command, status, stderr))]
    UnsuccessfulExecution {
        command: String,
        status: i32,
        stderr: String,
    },
}
