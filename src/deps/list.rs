//! Flat list parser for `mvn dependency:list` output

use crate::deps::coordinate::{DependencyCoordinate, ResolvedDependency};
use crate::deps::info_payload;
use std::collections::HashSet;
use tracing::debug;

/// Suffix newer dependency plugins append for JPMS module names
const MODULE_SUFFIX: &str = " -- module ";

/// Start of a trailing annotation such as ` (optional)`
const ANNOTATION_START: &str = " (";

/// Parse dependency list output into unique records
///
/// The first occurrence of each `(groupId, artifactId)` wins; later
/// entries for the same artifact are dropped even if their version or
/// scope differ.
pub fn parse_list(text: &str) -> Vec<ResolvedDependency> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut resolved = Vec::new();

    for line in text.lines() {
        let Some(payload) = info_payload(line) else {
            continue;
        };
        if !payload.contains(':') {
            continue;
        }

        let payload = payload.trim();
        let coordinate_text = strip_annotations(payload);

        let coordinate = match DependencyCoordinate::decode(coordinate_text) {
            Ok(c) => c,
            Err(e) => {
                debug!("Skipping list line: {}", e);
                continue;
            }
        };

        let key = (coordinate.group_id.clone(), coordinate.artifact_id.clone());
        if seen.insert(key) {
            resolved.push(coordinate);
        } else {
            debug!("Dropping duplicate {}", coordinate);
        }
    }

    resolved
}

/// Cut module names and parenthesised annotations off a list entry
fn strip_annotations(payload: &str) -> &str {
    [MODULE_SUFFIX, ANNOTATION_START]
        .iter()
        .filter_map(|marker| payload.find(marker))
        .min()
        .map_or(payload, |index| &payload[..index])
}
