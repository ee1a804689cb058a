//! The explicit repository handle.
//!
//! Every operation receives a [`RepositoryHandle`] instead of consulting the
//! process working directory. The handle only knows paths; it performs no
//! I/O beyond [`RepositoryHandle::discover`].

use std::path::{Path, PathBuf};

/// Name of the repository metadata directory inside the working tree.
pub const META_DIR: &str = ".lit";

/// Paths that make up one repository.
///
/// ```text
/// <root>/
///   .lit/
///     HEAD
///     index
///     config.toml
///     objects/<2 hex>/<38 hex>
///     refs/heads/<branch>
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryHandle {
    root: PathBuf,
    meta_dir: PathBuf,
}

impl RepositoryHandle {
    /// Create a handle for the working tree rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let meta_dir = root.join(META_DIR);
        Self { root, meta_dir }
    }

    /// Walk up from `start` to the first directory that contains `.lit`.
    ///
    /// Returns `None` if no ancestor is a repository.
    pub fn discover(start: &Path) -> Option<Self> {
        start
            .ancestors()
            .find(|dir| dir.join(META_DIR).is_dir())
            .map(Self::new)
    }

    /// The working directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.lit` metadata directory.
    pub fn meta_dir(&self) -> &Path {
        &self.meta_dir
    }

    /// Root of the loose object store.
    pub fn objects_dir(&self) -> PathBuf {
        self.meta_dir.join("objects")
    }

    /// The staging index file.
    pub fn index_path(&self) -> PathBuf {
        self.meta_dir.join("index")
    }

    /// The HEAD file.
    pub fn head_path(&self) -> PathBuf {
        self.meta_dir.join("HEAD")
    }

    /// The optional configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.meta_dir.join("config.toml")
    }

    /// Directory that ref paths such as `refs/heads/main` are relative to.
    pub fn ref_root(&self) -> &Path {
        &self.meta_dir
    }

    /// Filesystem location of a `/`-separated ref path.
    pub fn ref_file(&self, ref_path: &str) -> PathBuf {
        ref_path
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.meta_dir.clone(), |acc, part| acc.join(part))
    }

    /// Returns `true` if the metadata directory exists on disk.
    pub fn is_initialized(&self) -> bool {
        self.meta_dir.is_dir()
    }
}
