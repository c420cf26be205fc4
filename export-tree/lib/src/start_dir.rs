use std::path::{Component, Path, PathBuf};

use crate::error::ExportTreeError;

/// Makes `path` absolute and checks that it names an existing directory.
///
/// `.` and `..` are folded lexically. Symlinks are not resolved, so the
/// returned path keeps the shape the user typed.
///
/// ## Errors
/// Returns `PathNotFound` or `NotADirectory`, or `Io` if the current
/// directory cannot be determined.
pub fn resolve_start_dir<P: AsRef<Path>>(path: P) -> Result<PathBuf, ExportTreeError> {
    let path = path.as_ref();
    let absolute = std::path::absolute(path).map_err(|source| ExportTreeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let absolute = normalize_lexically(&absolute);

    if !absolute.exists() {
        return Err(ExportTreeError::PathNotFound { path: absolute });
    }

    if !absolute.is_dir() {
        return Err(ExportTreeError::NotADirectory { path: absolute });
    }

    Ok(absolute)
}

/// Drops `.` components and lets each `..` remove the component before it.
///
/// `..` at the root stays at the root.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                }
            }
            other => normalized.push(other),
        }
    }

    normalized
}
