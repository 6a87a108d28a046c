//! Root-directory confinement shared by the file tools.

use council_domain::ToolError;
use std::path::{Component, Path, PathBuf};

/// Resolve `requested` against `root`, refusing anything outside it.
///
/// `root` must already be canonical. Missing targets are `NOT_FOUND`,
/// targets escaping the root (including through symlinks) are
/// `PERMISSION_DENIED`.
pub(super) fn resolve(root: &Path, requested: &str) -> Result<PathBuf, ToolError> {
    let requested_path = Path::new(requested);
    let joined = if requested_path.is_absolute() {
        requested_path.to_path_buf()
    } else {
        root.join(requested_path)
    };
    let canonical = joined
        .canonicalize()
        .map_err(|_| ToolError::not_found(requested))?;
    if canonical.starts_with(root) {
        Ok(canonical)
    } else {
        Err(ToolError::permission_denied(requested))
    }
}

/// Whether a glob pattern stays below the root
pub(super) fn is_confined_pattern(pattern: &str) -> bool {
    let path = Path::new(pattern);
    !path.is_absolute()
        && path
            .components()
            .all(|c| !matches!(c, Component::ParentDir | Component::Prefix(_)))
}
