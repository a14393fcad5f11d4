//! Tree parser for `mvn dependency:tree` output
//!
//! Indentation is drawn with fixed three-character groups (`+- `, `\- `,
//! `|  `, `   `), so the depth of a line is the number of leading drawing
//! characters divided by three.

use crate::deps::coordinate::DependencyCoordinate;
use crate::deps::info_payload;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Width of one indentation level in the tree drawing
const INDENT_WIDTH: usize = 3;

/// Suffixes Maven appends inside parenthesised (omitted) entries, in match order.
/// Anything after the marker (the winning version, the managed-from version)
/// is discarded.
pub(crate) const OMISSION_MARKERS: &[(&str, OmittedReason)] = &[
    (" - omitted for conflict", OmittedReason::Conflict),
    (" - omitted for duplicate", OmittedReason::Duplicate),
    (" - omitted for cycle", OmittedReason::Cycle),
    (" - version managed from", OmittedReason::Managed),
];

/// Why a dependency was pruned from the resolved graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OmittedReason {
    #[default]
    None,
    Conflict,
    Duplicate,
    Cycle,
    Managed,
}

impl OmittedReason {
    /// Whether the node was pruned at all
    pub fn is_omitted(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for OmittedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Conflict => "conflict",
            Self::Duplicate => "duplicate",
            Self::Cycle => "cycle",
            Self::Managed => "managed",
        };
        write!(f, "{}", name)
    }
}

/// A node in the dependency forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    #[serde(flatten)]
    pub coordinate: DependencyCoordinate,

    /// Children in first-seen order
    #[serde(default)]
    pub children: Vec<DependencyNode>,

    #[serde(default)]
    pub omitted_reason: OmittedReason,
}

impl DependencyNode {
    /// Create a leaf node
    pub fn new(coordinate: DependencyCoordinate, omitted_reason: OmittedReason) -> Self {
        Self {
            coordinate,
            children: Vec::new(),
            omitted_reason,
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }
}

/// Arena slot used while the forest is being assembled
struct ArenaNode {
    coordinate: DependencyCoordinate,
    omitted_reason: OmittedReason,
    children: Vec<usize>,
}

/// Parse dependency tree output into a forest of root nodes
///
/// Lines that are noise or fail to decode are skipped. A line indented
/// deeper than anything before it has no parent and is dropped.
pub fn parse_tree(text: &str) -> Vec<DependencyNode> {
    let mut arena: Vec<ArenaNode> = Vec::new();
    let mut roots: Vec<usize> = Vec::new();
    // (arena index, depth)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for line in text.lines() {
        let Some(payload) = info_payload(line) else {
            continue;
        };

        let depth = indent_depth(payload);
        let body = payload.trim_start_matches(is_tree_glyph);
        let (coordinate_text, omitted_reason) = split_omission(body);

        let coordinate = match DependencyCoordinate::decode(coordinate_text) {
            Ok(c) => c,
            Err(e) => {
                debug!("Skipping tree line: {}", e);
                continue;
            }
        };

        if depth == 0 {
            let index = arena.len();
            arena.push(ArenaNode {
                coordinate,
                omitted_reason,
                children: Vec::new(),
            });
            roots.push(index);
            stack.clear();
            stack.push((index, 0));
            continue;
        }

        while stack.last().is_some_and(|&(_, d)| d >= depth) {
            stack.pop();
        }

        let Some(&(parent, _)) = stack.last() else {
            debug!("Dropping {} at depth {}: no parent", coordinate, depth);
            continue;
        };

        let index = arena.len();
        arena.push(ArenaNode {
            coordinate,
            omitted_reason,
            children: Vec::new(),
        });
        arena[parent].children.push(index);
        stack.push((index, depth));
    }

    assemble(arena, &roots)
}

/// Turn the index arena into owned subtrees
///
/// Children always sit at higher indices than their parent, so walking the
/// arena backwards finishes every child before its parent needs it.
fn assemble(arena: Vec<ArenaNode>, roots: &[usize]) -> Vec<DependencyNode> {
    let mut slots: Vec<Option<DependencyNode>> = (0..arena.len()).map(|_| None).collect();

    for (index, slot) in arena.into_iter().enumerate().rev() {
        let children = slot
            .children
            .iter()
            .filter_map(|&child| slots[child].take())
            .collect();

        slots[index] = Some(DependencyNode {
            coordinate: slot.coordinate,
            children,
            omitted_reason: slot.omitted_reason,
        });
    }

    roots.iter().filter_map(|&root| slots[root].take()).collect()
}

fn is_tree_glyph(c: char) -> bool {
    matches!(c, ' ' | '|' | '+' | '\\' | '-')
}

/// Indentation level of a payload line
fn indent_depth(payload: &str) -> usize {
    payload.chars().take_while(|&c| is_tree_glyph(c)).count() / INDENT_WIDTH
}

/// Separate the coordinate from omission annotations
fn split_omission(body: &str) -> (&str, OmittedReason) {
    if let Some(inner) = body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        for (marker, reason) in OMISSION_MARKERS {
            if let Some(index) = inner.find(marker) {
                return (&inner[..index], *reason);
            }
        }
        // Wrapped but unrecognised: decode as an ordinary node
        return (inner, OmittedReason::None);
    }

    // Verbose mode appends annotations such as "(version managed from 1.0)"
    match body.find(" (") {
        Some(index) => (&body[..index], OmittedReason::None),
        None => (body, OmittedReason::None),
    }
}
