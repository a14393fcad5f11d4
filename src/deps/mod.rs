//! Dependency output parsing
//!
//! Rebuilds structured dependency data from the human-readable output of
//! `mvn dependency:tree` and `mvn dependency:list`.
//!
//! Both parsers are best-effort: lines that are noise or that fail to
//! decode are skipped, never fatal.

pub mod coordinate;
pub mod list;
pub mod render;
pub mod tree;

pub use coordinate::{DependencyCoordinate, ResolvedDependency};
pub use list::parse_list;
pub use render::{flatten, render_tree, FlatNode};
pub use tree::{parse_tree, DependencyNode, OmittedReason};

/// Marker that prefixes every informational line
const INFO_MARKER: &str = "[INFO]";

/// Separator token found in plugin banners and section rules
const BANNER_TOKEN: &str = "---";

/// Prefix of transfer progress lines (`Downloading from`, `Downloaded from`)
const DOWNLOAD_TOKEN: &str = "Download";

/// Build status lines that contain colons but are not coordinates
const STATUS_PREFIXES: &[&str] = &[
    "BUILD ",
    "Total time",
    "Finished at",
    "Scanning for projects",
    "Building ",
];

/// Strip the informational marker and filter out noise
///
/// Returns the payload following `[INFO] ` with its leading whitespace
/// intact (the tree parser measures indentation from it), or `None` if the
/// line should be skipped.
pub(crate) fn info_payload(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(INFO_MARKER)?;
    let payload = rest.strip_prefix(' ').unwrap_or(rest);
    let trimmed = payload.trim();

    if trimmed.is_empty() || is_noise(trimmed) {
        return None;
    }
    Some(payload.trim_end())
}

fn is_noise(trimmed: &str) -> bool {
    trimmed.contains(BANNER_TOKEN)
        || trimmed.starts_with(DOWNLOAD_TOKEN)
        || STATUS_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}
