//! Working-directory scanning.

use std::fs;
use std::path::Path;

use lit_index::normalize_relative;
use lit_store::ObjectSink;
use lit_types::ObjectKind;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{TreeError, TreeResult};
use crate::ignore::IgnoreRules;
use crate::node::FolderNode;

/// Scan the directory at `root` into a [`FolderNode`].
///
/// Every regular file is read and handed to `sink` as a blob. Directories
/// are kept even when empty; they hash as the empty tree. Ignored names are
/// pruned at every depth. Symlinks, special files and names a tree line
/// cannot hold are skipped with a warning. Names that are not UTF-8 are an
/// error.
pub fn scan_workdir(
    root: &Path,
    ignore: &IgnoreRules,
    sink: &dyn ObjectSink,
) -> TreeResult<FolderNode> {
    let mut node = FolderNode::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !ignore.is_ignored_os(entry.file_name()) && storable(entry));

    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| TreeError::InvalidPath(entry.path().display().to_string()))?;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            node.ensure_dir(&normalize_relative(relative)?)?;
        } else if file_type.is_file() {
            let path = normalize_relative(relative)?;
            let data = fs::read(entry.path())?;
            let id = sink.put_bytes(ObjectKind::Blob, data)?;
            node.insert_file(&path, id)?;
        } else {
            warn!(path = %entry.path().display(), "skipping symlink or special file");
        }
    }

    debug!(
        root = %root.display(),
        files = node.file_count(),
        persisted = sink.persists(),
        "scanned working directory"
    );
    Ok(node)
}

/// Whether the entry's name fits in a tree line.
fn storable(entry: &walkdir::DirEntry) -> bool {
    let unstorable = entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.contains(['\n', '\r', '\0']));
    if unstorable {
        warn!(path = ?entry.path(), "skipping entry whose name cannot be stored");
    }
    !unstorable
}
