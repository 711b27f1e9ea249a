//! Command line display consumer for the changed-file tree.

mod tree_printer;

pub use tree_printer::{RenderOptions, render_children, render_reference_choices, render_tree};
