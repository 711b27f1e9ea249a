//! Serves the changed-file tree to a display consumer.
//!
//! The provider owns the reference point and the current [`TreeSnapshot`], and
//! resolves overlapping refreshes according to its [`RefreshPolicy`].

mod provider;
mod reference_choice;
mod refresh_policy;
mod snapshot;

pub use provider::{
    BranchDiffProvider, DEFAULT_FALLBACK_REFERENCE, ProviderError, ProviderSettings,
};
pub use reference_choice::{ChoiceAnnotation, ReferenceChoice};
pub use refresh_policy::{RefreshOutcome, RefreshPolicy, RefreshSignal};
pub use snapshot::TreeSnapshot;
