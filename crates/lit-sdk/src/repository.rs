use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use lit_chain::{Commit, CommitChain};
use lit_checkout::{Checkout, CheckoutOutcome, CheckoutState, DirtyReport};
use lit_index::{normalize_relative, Index};
use lit_refs::{branch_ref, FileRefStore, Head, RefStore, DEFAULT_BRANCH};
use lit_store::{Blob, LooseObjectStore, ObjectStore, StoreSink, StoredObject, Tree};
use lit_tree::{scan_workdir, tree_from_index, tree_from_workdir, IgnoreRules};
use lit_types::{ObjectId, RepositoryHandle};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RepoConfig;
use crate::error::{SdkError, SdkResult};

/// Whether [`Lit::init`] created a repository or found one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitStatus {
    Created,
    Reinitialized,
}

/// Input for [`Lit::write_tree`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TreeSource {
    #[default]
    Index,
    Workdir,
}

/// One step of [`Lit::log`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub id: ObjectId,
    #[serde(flatten)]
    pub commit: Commit,
}

/// Result of [`Lit::status`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RepoStatus {
    /// Branch name when HEAD is symbolic.
    pub branch: Option<String>,
    pub detached: bool,
    pub state: CheckoutState,
    pub report: DirtyReport,
}

/// High-level lit repository API.
pub struct Lit {
    handle: RepositoryHandle,
    store: LooseObjectStore,
    refs: FileRefStore,
    config: RepoConfig,
    ignore: IgnoreRules,
}

impl std::fmt::Debug for Lit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lit")
            .field("root", &self.handle.root())
            .field("config", &self.config)
            .finish()
    }
}

fn write_if_missing(path: &Path, contents: &str) -> SdkResult<bool> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(contents.as_bytes())?;
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn join_repo_path(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{prefix}/{path}")
    }
}

impl Lit {
    // ---- Lifecycle ----

    /// Create the `.lit` layout under `root`, keeping any existing files.
    pub fn init(root: &Path) -> SdkResult<(Self, InitStatus)> {
        let handle = RepositoryHandle::new(root);
        let status = if handle.is_initialized() {
            InitStatus::Reinitialized
        } else {
            InitStatus::Created
        };

        fs::create_dir_all(handle.objects_dir())?;
        fs::create_dir_all(handle.ref_file("refs/heads"))?;
        write_if_missing(&handle.head_path(), &Head::branch(DEFAULT_BRANCH)?.encode())?;
        write_if_missing(&handle.index_path(), "")?;
        write_if_missing(&handle.config_path(), &RepoConfig::default().to_toml_string()?)?;

        info!(root = %root.display(), ?status, "initialized repository");
        Ok((Self::open(root)?, status))
    }

    /// Open the repository whose working tree is `root`.
    pub fn open(root: &Path) -> SdkResult<Self> {
        if !RepositoryHandle::new(root).is_initialized() {
            return Err(SdkError::NotInitialized(root.display().to_string()));
        }
        let handle = RepositoryHandle::new(fs::canonicalize(root)?);
        let config = RepoConfig::load(&handle.config_path())?;
        debug!(root = %handle.root().display(), "opened repository");
        Ok(Self {
            store: LooseObjectStore::new(handle.objects_dir()),
            refs: FileRefStore::new(handle.clone()),
            ignore: config.ignore_rules(),
            config,
            handle,
        })
    }

    /// Open the repository containing `start`, searching parent directories.
    pub fn discover(start: &Path) -> SdkResult<Self> {
        let handle = RepositoryHandle::discover(start)
            .ok_or_else(|| SdkError::NotInitialized(start.display().to_string()))?;
        Self::open(handle.root())
    }

    pub fn handle(&self) -> &RepositoryHandle {
        &self.handle
    }

    pub fn store(&self) -> &dyn ObjectStore {
        &self.store
    }

    pub fn refs(&self) -> &dyn RefStore {
        &self.refs
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn load_index(&self) -> SdkResult<Index> {
        Ok(Index::load(&self.handle.index_path())?)
    }

    // ---- Objects ----

    /// Blob id of the file at `path`; stores the blob when `write` is set.
    pub fn hash_object(&self, path: &Path, write: bool) -> SdkResult<ObjectId> {
        let data = fs::read(path)?;
        if write {
            Ok(self.store.write_blob(&data)?)
        } else {
            Ok(Blob::id_of(&data))
        }
    }

    pub fn cat_file(&self, id: &ObjectId) -> SdkResult<StoredObject> {
        Ok(self.store.get(id)?)
    }

    pub fn ls_tree(&self, id: &ObjectId) -> SdkResult<Tree> {
        Ok(self.store.read_tree(id)?)
    }

    /// Persist a tree built from the index or the working directory.
    pub fn write_tree(&self, source: TreeSource) -> SdkResult<ObjectId> {
        let sink = StoreSink::new(&self.store);
        let id = match source {
            TreeSource::Index => tree_from_index(&self.load_index()?, &sink)?,
            TreeSource::Workdir => tree_from_workdir(self.handle.root(), &self.ignore, &sink)?,
        };
        Ok(id)
    }

    // ---- Staging ----

    /// Stage a file, or every non-ignored file under a directory.
    ///
    /// Relative targets are resolved against the repository root. Returns
    /// the staged `(path, blob id)` pairs.
    pub fn add(&self, target: &Path) -> SdkResult<Vec<(String, ObjectId)>> {
        let relative = self.repo_relative(target)?;
        let prefix = if relative.as_os_str().is_empty() {
            String::new()
        } else {
            normalize_relative(&relative)?
        };
        if prefix.split('/').any(|segment| self.ignore.is_ignored(segment)) {
            return Err(SdkError::InvalidPath(format!("{prefix} is ignored")));
        }

        let absolute = self.handle.root().join(&relative);
        let metadata = fs::metadata(&absolute)?;
        let sink = StoreSink::new(&self.store);
        let staged = if metadata.is_dir() {
            scan_workdir(&absolute, &self.ignore, &sink)?
                .file_paths()
                .into_iter()
                .map(|(path, id)| (join_repo_path(&prefix, &path), id))
                .collect()
        } else if metadata.is_file() {
            vec![(prefix, self.store.write_blob(&fs::read(&absolute)?)?)]
        } else {
            return Err(SdkError::InvalidPath(format!(
                "{} is not a file or directory",
                target.display()
            )));
        };

        let mut index = self.load_index()?;
        for (path, id) in &staged {
            index.stage(path, *id)?;
        }
        index.save(&self.handle.index_path())?;
        info!(count = staged.len(), "staged paths");
        Ok(staged)
    }

    /// Lexically resolve `target` and make it relative to the root.
    fn repo_relative(&self, target: &Path) -> SdkResult<PathBuf> {
        let joined = if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.handle.root().join(target)
        };
        let mut clean = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    clean.pop();
                }
                other => clean.push(other.as_os_str()),
            }
        }
        clean
            .strip_prefix(self.handle.root())
            .map(Path::to_path_buf)
            .map_err(|_| {
                SdkError::InvalidPath(format!("{} is outside the repository", target.display()))
            })
    }

    // ---- History ----

    /// Resolve `HEAD`, a branch name, a `refs/...` path or a full hash.
    pub fn resolve_revision(&self, rev: &str) -> SdkResult<ObjectId> {
        if rev == "HEAD" {
            return match self.refs.head()? {
                Some(Head::Symbolic(path)) => self.refs.read_ref(&path)?.ok_or(SdkError::NoRef(path)),
                Some(Head::Detached(id)) => Ok(id),
                None => Err(SdkError::NoRef("HEAD".to_string())),
            };
        }
        if let Ok(id) = ObjectId::from_hex(rev) {
            return Ok(id);
        }
        let path = if rev.starts_with("refs/") {
            rev.to_string()
        } else {
            branch_ref(rev).map_err(|_| SdkError::UnknownRevision(rev.to_string()))?
        };
        match self.refs.read_ref(&path) {
            Ok(Some(id)) => Ok(id),
            _ => Err(SdkError::UnknownRevision(rev.to_string())),
        }
    }

    /// The branch ref path HEAD names.
    fn current_branch_ref(&self) -> SdkResult<String> {
        match self.refs.head()? {
            Some(Head::Symbolic(path)) => Ok(path),
            _ => Err(SdkError::DetachedHeadCommit),
        }
    }

    /// Commit `tree` on the current branch and advance it.
    pub fn commit_tree(&self, tree: ObjectId, message: &str) -> SdkResult<ObjectId> {
        let ref_path = self.current_branch_ref()?;
        let parent = self.refs.read_ref(&ref_path)?;
        let id = CommitChain::new(&self.store).commit(tree, parent, &self.config.author(), message)?;
        self.refs.write_ref(&ref_path, &id)?;
        Ok(id)
    }

    /// Commit the index on the current branch.
    pub fn commit(&self, message: &str) -> SdkResult<ObjectId> {
        self.current_branch_ref()?;
        let tree = self.write_tree(TreeSource::Index)?;
        self.commit_tree(tree, message)
    }

    /// History from HEAD, youngest first. Empty before the first commit.
    pub fn log(&self, limit: Option<usize>) -> SdkResult<Vec<LogEntry>> {
        let Some(start) = self.refs.resolve_head()? else {
            return Ok(Vec::new());
        };
        let chain = CommitChain::new(&self.store);
        let mut entries = Vec::new();
        for step in chain.walk(start).take(limit.unwrap_or(usize::MAX)) {
            let (id, commit) = step?;
            entries.push(LogEntry { id, commit });
        }
        Ok(entries)
    }

    // ---- Working directory ----

    fn checkout_machine(&self) -> Checkout<'_> {
        Checkout::new(&self.handle, &self.store, &self.refs, &self.ignore)
            .with_policy(self.config.checkout_policy())
    }

    /// Check out `rev` through the dirty gate.
    pub fn checkout(&self, rev: &str) -> SdkResult<CheckoutOutcome> {
        let target = self.resolve_revision(rev)?;
        Ok(self.checkout_machine().checkout(&target)?)
    }

    /// HEAD, index and working-directory trees and the gate outcome.
    pub fn status(&self) -> SdkResult<RepoStatus> {
        let head = self.refs.head()?;
        let report = self.checkout_machine().assess()?;
        Ok(RepoStatus {
            branch: head.as_ref().and_then(|h| h.branch_name()).map(str::to_string),
            detached: head.as_ref().is_some_and(Head::is_detached),
            state: report.state(),
            report,
        })
    }
}
