use std::io::{self, Write};

use colored::Colorize;
use tracing::{error, warn};

use crate::compactor::DisplayNode;
use crate::filesystem::ChangedPath;
use crate::provider::{BranchDiffProvider, ChoiceAnnotation, ReferenceChoice};
use crate::source::PathSetSource;

const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub color: bool,
    pub absolute: bool,
}

/// Prints the whole tree, expanding every node lazily the way a tree widget would.
///
/// A failing root query is logged and rendered as an empty tree. Returns the number of
/// files printed.
pub async fn render_tree<S, W>(
    provider: &BranchDiffProvider<S>,
    out: &mut W,
    options: RenderOptions,
) -> io::Result<usize>
where
    S: PathSetSource,
    W: Write,
{
    let roots = match provider.root_children().await {
        Ok(roots) => roots,
        Err(err) => {
            error!("Could not list changed files: {}", err);
            Vec::new()
        }
    };

    writeln!(out, "Changes against {}", provider.reference_point())?;
    let mut files = 0;
    for node in &roots {
        files += render_node(provider, node, 0, out, options)?;
    }
    Ok(files)
}

fn render_node<S, W>(
    provider: &BranchDiffProvider<S>,
    node: &DisplayNode,
    depth: usize,
    out: &mut W,
    options: RenderOptions,
) -> io::Result<usize>
where
    S: PathSetSource,
    W: Write,
{
    writeln!(out, "{}", format_node(node, depth, options))?;
    if !node.is_expandable() {
        return Ok(1);
    }

    let mut files = 0;
    for child in provider.children(node) {
        files += render_node(provider, &child, depth + 1, out, options)?;
    }
    Ok(files)
}

/// Prints the children of the node addressed by a `/`-separated relative path.
pub async fn render_children<S, W>(
    provider: &BranchDiffProvider<S>,
    relative_path: &str,
    out: &mut W,
    options: RenderOptions,
) -> io::Result<usize>
where
    S: PathSetSource,
    W: Write,
{
    let roots = match provider.root_children().await {
        Ok(roots) => roots,
        Err(err) => {
            error!("Could not list changed files: {}", err);
            return Ok(0);
        }
    };

    let children = match ChangedPath::parse(relative_path) {
        Some(path) => provider.children_at(path.segments()),
        None => roots,
    };
    if children.is_empty() {
        warn!("'{}' has no children in the current tree", relative_path);
    }

    for child in &children {
        writeln!(out, "{}", format_node(child, 0, options))?;
    }
    Ok(children.len())
}

pub fn render_reference_choices<W: Write>(
    choices: &[ReferenceChoice],
    out: &mut W,
    options: RenderOptions,
) -> io::Result<()> {
    for choice in choices {
        match choice.annotation {
            Some(annotation) => {
                let text = format!("({})", annotation);
                let text = match (options.color, annotation) {
                    (false, _) => text,
                    (true, ChoiceAnnotation::CurrentBranch) => text.as_str().dimmed().to_string(),
                    (true, ChoiceAnnotation::Reference) => text.as_str().green().to_string(),
                };
                writeln!(out, "{}  {}", choice.label, text)?;
            }
            None => writeln!(out, "{}", choice.label)?,
        }
    }
    Ok(())
}

fn format_node(node: &DisplayNode, depth: usize, options: RenderOptions) -> String {
    let indent = INDENT.repeat(depth);

    if node.is_expandable() {
        let label = format!("{}/", node.label());
        let label = if options.color {
            label.as_str().blue().bold().to_string()
        } else {
            label
        };
        return format!("{}{}", indent, label);
    }

    if options.absolute {
        format!(
            "{}{}  {}",
            indent,
            node.label(),
            node.absolute_path().display()
        )
    } else {
        format!("{}{}", indent, node.label())
    }
}
