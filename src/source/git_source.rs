use std::path::{Path, PathBuf};
use std::process::Stdio;

use compio::process::Command;
use snafu::ResultExt;
use tracing::{debug, info};

use crate::ext::WorkspacePathExt;
use crate::source::path_set_source::{SpawnSnafu, UnsuccessfulExecutionSnafu};
use crate::source::{
    PathSetSource, ReferencePoint, SourceError, parse_branch_list, parse_show_branch,
};

const GIT: &str = "git";

/// Path source backed by the `git` executable, run inside the workspace root.
#[derive(Debug, Clone)]
pub struct GitSource {
    workspace_root: PathBuf,
}

impl GitSource {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }

    /// Opens the repository containing `path`, rooted at its top-level directory.
    ///
    /// Paths listed by `git diff --name-only` are relative to that directory.
    pub async fn discover(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let candidate = Self::new(path);
        let output = candidate.run(&["rev-parse", "--show-toplevel"]).await?;
        let top_level = output.trim();
        if top_level.is_empty() {
            return Ok(candidate);
        }

        debug!(
            "Repository of {} is rooted at {}",
            candidate.workspace_root.best_effort_display(),
            top_level
        );
        Ok(Self::new(top_level))
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Creates the git command with its working directory, captured stdio and no pager
    fn create_command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(GIT);
        cmd.args(args);
        cmd.current_dir(&self.workspace_root);
        cmd.env("GIT_PAGER", "cat");
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        let _ = cmd.stdin(Stdio::null());
        let _ = cmd.stdout(Stdio::piped());
        let _ = cmd.stderr(Stdio::piped());
        cmd
    }

    /// Runs git to completion and returns its stdout
    async fn run(&self, args: &[&str]) -> Result<String, SourceError> {
        let command = format!("{} {}", GIT, args.join(" "));
        debug!(
            "Running '{}' in {}",
            command,
            self.workspace_root.best_effort_display()
        );

        let output = self
            .create_command(args)
            .output()
            .await
            .context(SpawnSnafu {
                command: command.clone(),
                workspace: self.workspace_root.best_effort_display(),
            })?;

        if !output.status.success() {
            return UnsuccessfulExecutionSnafu {
                command,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .fail();
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl PathSetSource for GitSource {
    async fn list_changed_paths(
        &self,
        reference: &ReferencePoint,
    ) -> Result<Vec<String>, SourceError> {
        let mut args = vec!["diff", "--name-only"];
        if !reference.is_empty() {
            args.push(reference.as_str());
        }

        let output = self.run(&args).await?;
        let paths = output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        info!("{} files differ from '{}'", paths.len(), reference);
        Ok(paths)
    }

    async fn detect_default_reference(&self) -> Result<String, SourceError> {
        let current_branch = self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        let current_branch = current_branch.trim();
        let show_branch = self.run(&["show-branch"]).await?;

        let detected = parse_show_branch(&show_branch, current_branch).unwrap_or_default();
        debug!(
            "Detected reference '{}' for current branch '{}'",
            detected, current_branch
        );
        Ok(detected)
    }

    async fn list_reference_points(&self) -> Result<Vec<String>, SourceError> {
        let output = self.run(&["branch"]).await?;
        Ok(parse_branch_list(&output))
    }
}
