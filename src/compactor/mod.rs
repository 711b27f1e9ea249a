//! Turns a position in the changed-file tree into display nodes, folding chains of
//! single-child directories into one node.

mod display_node;
mod emitter;

pub use display_node::DisplayNode;
pub use emitter::emit_children;
