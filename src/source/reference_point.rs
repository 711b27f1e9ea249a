use derive_more::{Deref, Display};

/// Marker `git branch` puts in front of the checked-out branch.
pub const CURRENT_BRANCH_MARKER: char = '*';

/// Branch or commit the working tree is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Display, Deref)]
pub struct ReferencePoint(String);

impl ReferencePoint {
    pub fn new(id: impl Into<String>) -> Self {
        ReferencePoint(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReferencePoint {
    fn from(id: &str) -> Self {
        ReferencePoint::new(id)
    }
}

impl From<String> for ReferencePoint {
    fn from(id: String) -> Self {
        ReferencePoint::new(id)
    }
}

/// Picks the branch the current one most likely forked from out of `git show-branch`.
///
/// Takes the first commit line marked as part of the current branch that does not
/// mention the current branch itself, and returns the name inside its brackets with any
/// `~n`/`^n` ancestry suffix cut off.
pub fn parse_show_branch(output: &str, current_branch: &str) -> Option<String> {
    output
        .lines()
        .map(|line| line.split(']').next().unwrap_or(line))
        .filter(|line| line.contains(CURRENT_BRANCH_MARKER))
        .find(|line| !line.contains(current_branch))
        .map(|line| line.rsplit('[').next().unwrap_or(line))
        .map(|name| name.split(['~', '^']).next().unwrap_or(name).trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Normalizes `git branch` output into one entry per branch.
///
/// The checked-out branch keeps its leading `* ` marker.
pub fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.replacen("  ", "", 1).trim_end().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
