//! Transient in-memory directory structure used while building trees.

use std::collections::BTreeMap;

use lit_index::Index;
use lit_types::ObjectId;

use crate::error::{TreeError, TreeResult};

/// One directory level: file name to blob id, and dir name to child node.
///
/// Both maps are `BTreeMap<String, _>`, so names iterate in byte order no
/// matter which source filled the node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FolderNode {
    pub files: BTreeMap<String, ObjectId>,
    pub dirs: BTreeMap<String, FolderNode>,
}

impl FolderNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the folder structure for every staged path.
    pub fn from_index(index: &Index) -> TreeResult<Self> {
        let mut root = Self::new();
        for (path, id) in index.iter() {
            root.insert_file(path, *id)?;
        }
        Ok(root)
    }

    /// Returns `true` if the node has no files and no subdirectories.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }

    /// Total number of files below this node.
    pub fn file_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += node.files.len();
            pending.extend(node.dirs.values());
        }
        count
    }

    /// Every file below this node as `(path, blob id)`, paths `/`-joined and
    /// sorted.
    pub fn file_paths(&self) -> Vec<(String, ObjectId)> {
        let mut out = Vec::new();
        let mut pending = vec![(String::new(), self)];
        while let Some((prefix, node)) = pending.pop() {
            for (name, id) in &node.files {
                out.push((join(&prefix, name), *id));
            }
            for (name, child) in &node.dirs {
                pending.push((join(&prefix, name), child));
            }
        }
        out.sort();
        out
    }

    /// Walk (creating as needed) the directory at `/`-separated `path`.
    ///
    /// An empty path is this node.
    pub fn ensure_dir(&mut self, path: &str) -> TreeResult<&mut FolderNode> {
        let mut node = self;
        let mut walked = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if !walked.is_empty() {
                walked.push('/');
            }
            walked.push_str(segment);
            if node.files.contains_key(segment) {
                return Err(TreeError::PathConflict(walked));
            }
            node = node.dirs.entry(segment.to_string()).or_default();
        }
        Ok(node)
    }

    /// Place a file at `/`-separated `path`, creating parent directories.
    pub fn insert_file(&mut self, path: &str, id: ObjectId) -> TreeResult<()> {
        let (parent, name) = match path.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", path),
        };
        if name.is_empty() {
            return Err(TreeError::InvalidPath(path.to_string()));
        }
        let node = self.ensure_dir(parent)?;
        if node.dirs.contains_key(name) {
            return Err(TreeError::PathConflict(path.to_string()));
        }
        node.files.insert(name.to_string(), id);
        Ok(())
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}
