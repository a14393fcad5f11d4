//! Forest traversal and Maven-style rendering

use crate::deps::tree::{DependencyNode, OmittedReason, OMISSION_MARKERS};
use std::fmt::Write;

/// One row of a flattened forest
#[derive(Debug, Clone, Copy)]
pub struct FlatNode<'a> {
    /// Distance from the root (roots are 0)
    pub depth: usize,
    /// Row index of the parent, if any
    pub parent: Option<usize>,
    pub node: &'a DependencyNode,
}

/// Flatten a forest into pre-order rows
///
/// Parents are referenced by row index, which gives callers a parent
/// lookup table without back-pointers in the tree itself.
pub fn flatten(forest: &[DependencyNode]) -> Vec<FlatNode<'_>> {
    let mut rows = Vec::new();
    let mut pending: Vec<(usize, Option<usize>, &DependencyNode)> =
        forest.iter().rev().map(|n| (0, None, n)).collect();

    while let Some((depth, parent, node)) = pending.pop() {
        let index = rows.len();
        rows.push(FlatNode {
            depth,
            parent,
            node,
        });
        pending.extend(
            node.children
                .iter()
                .rev()
                .map(|child| (depth + 1, Some(index), child)),
        );
    }

    rows
}

/// Render a forest as `[INFO]`-prefixed tree text
///
/// The output uses the same drawing convention as `dependency:tree`, so
/// feeding it back through `parse_tree` yields the same forest.
pub fn render_tree(forest: &[DependencyNode]) -> String {
    let mut out = String::new();
    // (node, indentation prefix, is last sibling, is root)
    let mut pending: Vec<(&DependencyNode, String, bool, bool)> = forest
        .iter()
        .rev()
        .map(|n| (n, String::new(), false, true))
        .collect();

    while let Some((node, prefix, is_last, is_root)) = pending.pop() {
        let connector = match (is_root, is_last) {
            (true, _) => "",
            (false, true) => "\\- ",
            (false, false) => "+- ",
        };
        let _ = writeln!(out, "[INFO] {}{}{}", prefix, connector, node_label(node));

        let child_prefix = if is_root {
            String::new()
        } else if is_last {
            format!("{}   ", prefix)
        } else {
            format!("{}|  ", prefix)
        };

        let count = node.children.len();
        for (i, child) in node.children.iter().enumerate().rev() {
            pending.push((child, child_prefix.clone(), i + 1 == count, false));
        }
    }

    out
}

/// Coordinate text for one node, wrapped when it was omitted
fn node_label(node: &DependencyNode) -> String {
    if !node.omitted_reason.is_omitted() {
        return node.coordinate.to_string();
    }
    let marker = OMISSION_MARKERS
        .iter()
        .find(|(_, reason)| *reason == node.omitted_reason)
        .map(|(marker, _)| *marker)
        .unwrap_or_default();
    format!("({}{})", node.coordinate, marker)
}

/// Plain label used by the CLI (`artifact:version [reason]`)
pub fn short_label(node: &DependencyNode) -> String {
    let c = &node.coordinate;
    let mut label = format!("{}:{}:{}", c.group_id, c.artifact_id, c.version);
    if let Some(scope) = &c.scope {
        let _ = write!(label, " ({})", scope);
    }
    if node.omitted_reason != OmittedReason::None {
        let _ = write!(label, " [omitted: {}]", node.omitted_reason);
    }
    label
}
