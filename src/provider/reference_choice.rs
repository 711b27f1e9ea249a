use std::fmt;

use crate::source::{CURRENT_BRANCH_MARKER, ReferencePoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceAnnotation {
    CurrentBranch,
    Reference,
}

impl fmt::Display for ChoiceAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceAnnotation::CurrentBranch => write!(f, "current branch"),
            ChoiceAnnotation::Reference => write!(f, "reference branch"),
        }
    }
}

/// An entry of the reference point picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceChoice {
    pub label: String,
    pub annotation: Option<ChoiceAnnotation>,
}

impl ReferenceChoice {
    /// Annotates branch entries, marking the checked-out one and the active reference.
    pub fn annotate(entries: Vec<String>, reference: &ReferencePoint) -> Vec<Self> {
        entries
            .into_iter()
            .map(|label| {
                let annotation = if label.as_str() == reference.as_str() {
                    Some(ChoiceAnnotation::Reference)
                } else if is_current_branch(&label) {
                    Some(ChoiceAnnotation::CurrentBranch)
                } else {
                    None
                };
                ReferenceChoice { label, annotation }
            })
            .collect()
    }

    /// The label without the checked-out marker, i.e. what `git` knows the branch as.
    pub fn branch_name(&self) -> &str {
        self.label.trim_start_matches(CURRENT_BRANCH_MARKER).trim()
    }
}

/// The checked-out branch cannot be its own reference.
pub fn is_current_branch(label: &str) -> bool {
    label.starts_with(CURRENT_BRANCH_MARKER)
}
