//! Path protection policy.
//!
//! Decides, from the path string alone, whether a file is off-limits for
//! direct coordinator edits. No filesystem access: classification must
//! give the same answer whether or not the file exists yet.

use crate::rules::{CODE_EXTENSIONS, DOC_EXTENSIONS, SOURCE_ROOTS, WORKSPACE_DATA_DIR};

/// Whether a path is protected from direct coordinator writes.
///
/// A path is protected iff it sits under a source-root prefix and carries
/// a code extension. Exemptions always override: documentation extensions
/// and anything under the workflow's private data directory are never
/// protected.
pub fn is_protected_path(path: &str) -> bool {
    let normalized = normalize_path(path);

    // Exemptions win over any directory/extension match.
    if normalized.starts_with(WORKSPACE_DATA_DIR) {
        return false;
    }
    if has_extension(&normalized, DOC_EXTENSIONS) {
        return false;
    }

    SOURCE_ROOTS.iter().any(|root| normalized.starts_with(root))
        && has_extension(&normalized, CODE_EXTENSIONS)
}

/// Strip a leading `./` and fold backslashes so Windows-style paths
/// classify the same as forward-slash paths.
fn normalize_path(path: &str) -> String {
    let forward = path.replace('\\', "/");
    forward
        .strip_prefix("./")
        .map(|s| s.to_string())
        .unwrap_or(forward)
}

fn has_extension(path: &str, extensions: &[&str]) -> bool {
    let lower = path.to_lowercase();
    extensions.iter().any(|ext| lower.ends_with(ext))
}
