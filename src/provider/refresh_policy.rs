use std::sync::Arc;

use crate::provider::TreeSnapshot;
use crate::source::ReferencePoint;

/// How overlapping refreshes are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Only the most recently requested refresh may replace the tree
    #[default]
    LatestRequested,
    /// Whichever fetch completes last replaces the tree, even if it was requested earlier
    LastCompleted,
}

impl RefreshPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "latest-requested" => Some(RefreshPolicy::LatestRequested),
            "last-completed" => Some(RefreshPolicy::LastCompleted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The new snapshot is now the current one
    Installed(Arc<TreeSnapshot>),
    /// A newer refresh was requested while this one was fetching; its result was dropped
    Superseded { generation: u64, latest: u64 },
}

/// Sent to subscribers whenever the tree should be queried again from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshSignal {
    Invalidated,
    ReferenceChanged(ReferencePoint),
}
