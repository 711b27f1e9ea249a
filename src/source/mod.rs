//! Where changed paths and reference points come from.

mod git_source;
mod path_set_source;
mod reference_point;
#[cfg(test)]
pub mod testing;

pub use git_source::GitSource;
pub use path_set_source::{PathSetSource, SourceError};
pub use reference_point::{
    CURRENT_BRANCH_MARKER, ReferencePoint, parse_branch_list, parse_show_branch,
};
