use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use snafu::{ResultExt, Snafu};
use tracing::{debug, info, warn};

use crate::compactor::DisplayNode;
use crate::filesystem::{OverlapPolicy, PathTree, TreeBuildError, parse_changed_paths};
use crate::provider::reference_choice::is_current_branch;
use crate::provider::{
    RefreshOutcome, RefreshPolicy, RefreshSignal, ReferenceChoice, TreeSnapshot,
};
use crate::source::{PathSetSource, ReferencePoint, SourceError};

/// Reference used when auto-detection finds nothing
pub const DEFAULT_FALLBACK_REFERENCE: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub fallback_reference: ReferencePoint,
    pub sort: bool,
    pub overlap: OverlapPolicy,
    pub refresh_policy: RefreshPolicy,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            fallback_reference: ReferencePoint::new(DEFAULT_FALLBACK_REFERENCE),
            sort: false,
            overlap: OverlapPolicy::default(),
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

/// Serves the changed-file tree to a display, one level at a time.
///
/// Root queries fetch the current path set and swap in a freshly built snapshot. Child
/// queries are answered from the current snapshot by re-descending it along the node's
/// relative path, so nodes from an older generation simply come back empty.
pub struct BranchDiffProvider<S> {
    source: S,
    workspace_root: PathBuf,
    settings: ProviderSettings,
    reference: RefCell<ReferencePoint>,
    current: RefCell<Option<Arc<TreeSnapshot>>>,
    latest_requested: Cell<u64>,
    subscribers: RefCell<Vec<UnboundedSender<RefreshSignal>>>,
}

impl<S: PathSetSource> BranchDiffProvider<S> {
    pub fn new(
        source: S,
        workspace_root: impl Into<PathBuf>,
        settings: ProviderSettings,
        reference: ReferencePoint,
    ) -> Self {
        Self {
            source,
            workspace_root: workspace_root.into(),
            settings,
            reference: RefCell::new(reference),
            current: RefCell::new(None),
            latest_requested: Cell::new(0),
            subscribers: RefCell::new(Vec::new()),
        }
    }

    /// Creates a provider, detecting the reference point unless one is given.
    pub async fn connect(
        source: S,
        workspace_root: impl Into<PathBuf>,
        settings: ProviderSettings,
        reference: Option<ReferencePoint>,
    ) -> Self {
        let provider = Self::new(source, workspace_root, settings, ReferencePoint::default());
        let reference = match reference {
            Some(reference) => reference,
            None => provider.detect_reference().await,
        };
        info!("Comparing against '{}'", reference);
        *provider.reference.borrow_mut() = reference;
        provider
    }

    async fn detect_reference(&self) -> ReferencePoint {
        let fallback = &self.settings.fallback_reference;
        match self.source.detect_default_reference().await {
            Ok(detected) if !detected.trim().is_empty() => ReferencePoint::new(detected),
            Ok(_) => {
                warn!(
                    "Could not detect a reference point, falling back to '{}'",
                    fallback
                );
                fallback.clone()
            }
            Err(err) => {
                warn!(
                    "Reference point detection failed ({}), falling back to '{}'",
                    err, fallback
                );
                fallback.clone()
            }
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn reference_point(&self) -> ReferencePoint {
        self.reference.borrow().clone()
    }

    /// Compares against `reference` from now on; subscribers are told to re-query.
    pub fn set_reference_point(&self, reference: impl Into<ReferencePoint>) {
        let reference = reference.into();
        info!("Reference point changed to '{}'", reference);
        *self.reference.borrow_mut() = reference.clone();
        self.notify(RefreshSignal::ReferenceChanged(reference));
    }

    /// Re-runs reference detection, e.g. after the checked-out branch changed.
    pub async fn refresh_reference_point(&self) {
        let reference = self.detect_reference().await;
        self.set_reference_point(reference);
    }

    /// Applies a picker selection. The checked-out branch is not a valid choice.
    pub fn select_reference_point(&self, label: &str) -> bool {
        if is_current_branch(label) {
            debug!("Ignoring selection of the current branch '{}'", label);
            return false;
        }
        self.set_reference_point(label);
        true
    }

    /// Marks the tree as outdated; the next root query rebuilds it.
    pub fn invalidate(&self) {
        debug!("Changed-file tree invalidated");
        self.notify(RefreshSignal::Invalidated);
    }

    pub fn subscribe(&self) -> UnboundedReceiver<RefreshSignal> {
        let (sender, receiver) = mpsc::unbounded();
        self.subscribers.borrow_mut().push(sender);
        receiver
    }

    fn notify(&self, signal: RefreshSignal) {
        self.subscribers
            .borrow_mut()
            .retain(|subscriber| subscriber.unbounded_send(signal.clone()).is_ok());
    }

    pub fn snapshot(&self) -> Option<Arc<TreeSnapshot>> {
        self.current.borrow().clone()
    }

    /// Fetches the current path set and builds a new snapshot from it.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ProviderError> {
        let generation = self.latest_requested.get() + 1;
        self.latest_requested.set(generation);
        let reference = self.reference_point();
        debug!(
            "Requesting tree generation {} against '{}'",
            generation, reference
        );

        let changed = self
            .source
            .list_changed_paths(&reference)
            .await
            .context(SourceUnavailableSnafu {
                reference: reference.to_string(),
            })?;

        let mut paths = parse_changed_paths(&changed);
        if self.settings.sort {
            paths.sort();
        }
        let tree = PathTree::build(paths, self.settings.overlap).context(TreeConstructionSnafu)?;

        let latest = self.latest_requested.get();
        if self.settings.refresh_policy == RefreshPolicy::LatestRequested && generation != latest {
            info!(
                "Discarding tree generation {}, generation {} was requested meanwhile",
                generation, latest
            );
            return Ok(RefreshOutcome::Superseded { generation, latest });
        }

        let snapshot = Arc::new(TreeSnapshot::new(generation, reference, tree));
        *self.current.borrow_mut() = Some(snapshot.clone());
        debug!("Installed tree generation {}", generation);
        Ok(RefreshOutcome::Installed(snapshot))
    }

    /// Rebuilds the tree and emits its top level.
    pub async fn root_children(&self) -> Result<Vec<DisplayNode>, ProviderError> {
        match self.refresh().await? {
            RefreshOutcome::Installed(snapshot) => debug!(
                "Emitting roots of generation {} against '{}'",
                snapshot.generation(),
                snapshot.reference()
            ),
            RefreshOutcome::Superseded { generation, latest } => debug!(
                "Generation {} lost to generation {}, emitting the current tree",
                generation, latest
            ),
        }
        Ok(self.children_at::<&str>(&[]))
    }

    pub fn children(&self, node: &DisplayNode) -> Vec<DisplayNode> {
        self.children_at(node.relative_path())
    }

    /// Emits the children of the node at `relative_path` in the current snapshot.
    pub fn children_at<P: AsRef<str>>(&self, relative_path: &[P]) -> Vec<DisplayNode> {
        match self.snapshot() {
            Some(snapshot) => snapshot.children(&self.workspace_root, relative_path),
            None => {
                debug!("Children requested before the tree was built");
                Vec::new()
            }
        }
    }

    /// Lists the reference points a user can pick from.
    pub async fn reference_choices(&self) -> Result<Vec<ReferenceChoice>, ProviderError> {
        let entries = self
            .source
            .list_reference_points()
            .await
            .context(BranchListingSnafu)?;
        Ok(ReferenceChoice::annotate(entries, &self.reference_point()))
    }
}

#[derive(Debug, Snafu)]
pub enum ProviderError {
    #[snafu(display("Changed files against '{}' are unavailable", reference))]
    SourceUnavailable {
        reference: String,
        source: SourceError,
    },
    #[snafu(display("Reference points are unavailable"))]
    BranchListingError { source: SourceError },
    #[snafu(display("Failed to build the changed-file tree"))]
    TreeConstructionError { source: TreeBuildError },
}
