//! Repository-relative path handling.
//!
//! Index keys always use `/` as the separator, whatever the host convention.

use std::path::{Component, Path};

use lit_types::META_DIR;

use crate::error::{IndexError, IndexResult};

/// Check that `path` is a usable index key.
///
/// A valid key is non-empty, `/`-separated, has no empty, `.` or `..`
/// segments, contains no NUL or newline, and never names the metadata
/// directory. Scans skip `.lit` at every depth, so the index does too.
pub fn validate_repo_path(path: &str) -> IndexResult<()> {
    if path.is_empty() {
        return Err(IndexError::InvalidPath("empty path".to_string()));
    }
    if path.contains(['\0', '\n', '\r']) {
        return Err(IndexError::InvalidPath(format!(
            "{path:?} contains a control character"
        )));
    }
    for segment in path.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(IndexError::InvalidPath(format!(
                "{path:?} has an empty, '.' or '..' segment"
            )));
        }
        if segment == META_DIR {
            return Err(IndexError::InvalidPath(format!("{path:?} names {META_DIR}")));
        }
    }
    Ok(())
}

/// Convert a host path relative to the repository root into an index key.
pub fn normalize_relative(path: &Path) -> IndexResult<String> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    IndexError::InvalidPath(format!("{} is not UTF-8", path.display()))
                })?;
                segments.push(part);
            }
            Component::CurDir => {}
            _ => {
                return Err(IndexError::InvalidPath(format!(
                    "{} is not inside the repository",
                    path.display()
                )))
            }
        }
    }
    let joined = segments.join("/");
    validate_repo_path(&joined)?;
    Ok(joined)
}
