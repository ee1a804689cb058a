//! The checkout driver.

use lit_chain::CommitChain;
use lit_crypto::EMPTY_TREE;
use lit_index::Index;
use lit_refs::RefStore;
use lit_store::{HashOnlySink, ObjectStore};
use lit_tree::{clear_workdir, materialize, tree_from_index, tree_from_workdir, IgnoreRules, MaterializeStats};
use lit_types::{ObjectId, RepositoryHandle};
use tracing::{debug, info};

use crate::error::{CheckoutError, CheckoutResult};
use crate::report::{CheckoutPolicy, CheckoutState, DirtyReport};

/// What a successful checkout did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// Commit HEAD resolved to before the checkout.
    pub previous: Option<ObjectId>,
    /// The commit now checked out.
    pub target: ObjectId,
    /// The target commit's tree.
    pub tree: ObjectId,
    pub stats: MaterializeStats,
}

/// One checkout run against a repository.
pub struct Checkout<'a> {
    handle: &'a RepositoryHandle,
    store: &'a dyn ObjectStore,
    refs: &'a dyn RefStore,
    ignore: &'a IgnoreRules,
    policy: CheckoutPolicy,
    state: Option<CheckoutState>,
}

impl<'a> Checkout<'a> {
    pub fn new(
        handle: &'a RepositoryHandle,
        store: &'a dyn ObjectStore,
        refs: &'a dyn RefStore,
        ignore: &'a IgnoreRules,
    ) -> Self {
        Self {
            handle,
            store,
            refs,
            ignore,
            policy: CheckoutPolicy::default(),
            state: None,
        }
    }

    pub fn with_policy(mut self, policy: CheckoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The last state reached, `None` before [`assess`](Self::assess) runs.
    pub fn state(&self) -> Option<CheckoutState> {
        self.state
    }

    fn transition(&mut self, to: CheckoutState) {
        debug!(from = ?self.state, to = %to, "checkout state");
        self.state = Some(to);
    }

    /// Compute HEAD's tree, the index tree and the working-directory tree.
    ///
    /// Index and working-directory trees are hashed without writing any
    /// object.
    pub fn assess(&mut self) -> CheckoutResult<DirtyReport> {
        let head_commit = self.refs.resolve_head()?;
        let head_tree = match &head_commit {
            Some(id) => CommitChain::new(self.store).resolve_tree(id)?,
            None => EMPTY_TREE,
        };

        let index = Index::load(&self.handle.index_path())?;
        let index_tree = tree_from_index(&index, &HashOnlySink)?;
        let workdir_tree = tree_from_workdir(self.handle.root(), self.ignore, &HashOnlySink)?;

        let report = DirtyReport {
            head_commit,
            head_tree,
            index_tree,
            workdir_tree,
            policy: self.policy,
        };
        self.transition(report.state());
        Ok(report)
    }

    /// Check out commit `target`.
    ///
    /// Fails with [`CheckoutError::UncommittedChanges`] before touching the
    /// disk when the dirty gate fails. The target's tree is resolved before
    /// anything is deleted. HEAD moves only after every file is written.
    pub fn checkout(&mut self, target: &ObjectId) -> CheckoutResult<CheckoutOutcome> {
        let report = self.assess()?;
        if report.is_dirty() {
            return Err(CheckoutError::UncommittedChanges(Box::new(report)));
        }

        let tree = CommitChain::new(self.store).resolve_tree(target)?;
        // Fail on a missing or non-tree root before clearing anything.
        self.store.read_tree(&tree)?;

        self.transition(CheckoutState::Materializing);
        clear_workdir(self.handle.root(), self.ignore)?;
        let stats = materialize(self.store, &tree, self.handle.root())?;

        self.refs.move_head(target)?;
        self.transition(CheckoutState::Done);
        info!(
            target = %target.short_hex(),
            tree = %tree.short_hex(),
            files = stats.files,
            "checked out"
        );

        Ok(CheckoutOutcome {
            previous: report.head_commit,
            target: *target,
            tree,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::Path;

    use lit_chain::ChainError;
    use lit_refs::{FileRefStore, Head};
    use lit_store::{LooseObjectStore, StoreError, StoreSink};

    struct Fixture {
        _dir: tempfile::TempDir,
        handle: RepositoryHandle,
        store: LooseObjectStore,
        refs: FileRefStore,
        ignore: IgnoreRules,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let handle = RepositoryHandle::new(dir.path());
            fs::create_dir_all(handle.objects_dir()).unwrap();
            let refs = FileRefStore::new(handle.clone());
            refs.set_head(&Head::branch("main").unwrap()).unwrap();
            Self {
                store: LooseObjectStore::new(handle.objects_dir()),
                refs,
                handle,
                ignore: IgnoreRules::default(),
                _dir: dir,
            }
        }

        fn root(&self) -> &Path {
            self.handle.root()
        }

        fn write(&self, path: &str, content: &str) {
            let full = self.root().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }

        /// Stage exactly `files`, write them to disk, commit and advance HEAD.
        fn commit_files(&self, files: &[(&str, &str)], date: i64) -> ObjectId {
            let mut index = Index::new();
            for (path, content) in files {
                self.write(path, content);
                index.stage(path, self.store.write_blob(content.as_bytes()).unwrap()).unwrap();
            }
            index.save(&self.handle.index_path()).unwrap();
            let tree = tree_from_index(&index, &StoreSink::new(&self.store)).unwrap();
            let parent = self.refs.resolve_head().unwrap();
            let id = CommitChain::new(&self.store)
                .commit_at(tree, parent, "tester", "snapshot", date)
                .unwrap();
            self.refs.move_head(&id).unwrap();
            id
        }

        fn checkout(&self) -> Checkout<'_> {
            Checkout::new(&self.handle, &self.store, &self.refs, &self.ignore)
        }

        fn read(&self, path: &str) -> String {
            fs::read_to_string(self.root().join(path)).unwrap()
        }

        fn workdir_files(&self) -> BTreeMap<String, String> {
            let mut out = BTreeMap::new();
            let mut pending = vec![self.root().to_path_buf()];
            while let Some(dir) = pending.pop() {
                for entry in fs::read_dir(dir).unwrap() {
                    let entry = entry.unwrap();
                    let path = entry.path();
                    let rel = path.strip_prefix(self.root()).unwrap().to_string_lossy().replace('\\', "/");
                    if rel == ".lit" {
                        continue;
                    }
                    if path.is_dir() {
                        pending.push(path);
                    } else {
                        out.insert(rel, fs::read_to_string(&path).unwrap());
                    }
                }
            }
            out
        }
    }

    #[test]
    fn clean_checkout_restores_older_commit() {
        let fx = Fixture::new();
        let c1 = fx.commit_files(&[("a.txt", "one")], 1);
        let c1_tree = CommitChain::new(&fx.store).resolve_tree(&c1).unwrap();
        let c2 = fx.commit_files(&[("a.txt", "two"), ("src/b.js", "b")], 2);

        let mut checkout = fx.checkout();
        let outcome = checkout.checkout(&c1).unwrap();

        assert_eq!(checkout.state(), Some(CheckoutState::Done));
        assert_eq!(outcome.previous, Some(c2));
        assert_eq!(outcome.tree, c1_tree);
        assert_eq!(fx.read("a.txt"), "one");
        assert!(!fx.root().join("src").exists());
        assert_eq!(
            tree_from_workdir(fx.root(), &fx.ignore, &HashOnlySink).unwrap(),
            c1_tree
        );
        assert_eq!(fx.refs.read_ref("refs/heads/main").unwrap(), Some(c1));
        assert_eq!(fx.refs.head().unwrap(), Some(Head::branch("main").unwrap()));
    }

    #[test]
    fn untracked_file_is_dirty_under_both_policies() {
        for policy in [CheckoutPolicy::WorkingTreeOnly, CheckoutPolicy::WorkingTreeAndIndex] {
            let fx = Fixture::new();
            let c1 = fx.commit_files(&[("a.txt", "one")], 1);
            fx.write("extra.txt", "untracked");
            let before = fx.workdir_files();

            let mut checkout = fx.checkout().with_policy(policy);
            let err = checkout.checkout(&c1).unwrap_err();
            match err {
                CheckoutError::UncommittedChanges(report) => {
                    assert!(report.workdir_changed());
                    assert!(!report.index_changed());
                }
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(checkout.state(), Some(CheckoutState::Dirty));
            assert_eq!(fx.workdir_files(), before);
        }
    }

    #[test]
    fn modified_file_blocks_and_preserves_edits() {
        let fx = Fixture::new();
        let c1 = fx.commit_files(&[("a.txt", "one")], 1);
        fx.commit_files(&[("a.txt", "two")], 2);
        fx.write("a.txt", "local edit");

        let err = fx.checkout().checkout(&c1).unwrap_err();
        assert!(matches!(err, CheckoutError::UncommittedChanges(_)));
        assert_eq!(fx.read("a.txt"), "local edit");
        assert_ne!(fx.refs.resolve_head().unwrap(), Some(c1));
    }

    #[test]
    fn stale_index_after_checkout_pins_policy() {
        let fx = Fixture::new();
        let c1 = fx.commit_files(&[("a.txt", "one")], 1);
        let c2 = fx.commit_files(&[("a.txt", "two")], 2);

        // Checkout leaves the index at c2's contents.
        fx.checkout().checkout(&c1).unwrap();

        let mut loose = fx.checkout();
        let report = loose.assess().unwrap();
        assert!(report.index_changed());
        assert!(!report.is_dirty());
        loose.checkout(&c2).unwrap();
        assert_eq!(fx.read("a.txt"), "two");

        // Now workdir is c2 and index is c2: go back to c1, then try strict.
        fx.checkout().checkout(&c1).unwrap();
        let mut strict = fx.checkout().with_policy(CheckoutPolicy::WorkingTreeAndIndex);
        assert!(matches!(
            strict.checkout(&c2),
            Err(CheckoutError::UncommittedChanges(_))
        ));
        assert_eq!(fx.read("a.txt"), "one");
    }

    #[test]
    fn unborn_repository_with_empty_workdir_is_clean() {
        let fx = Fixture::new();
        // Build a commit without moving HEAD.
        let blob = fx.store.write_blob(b"hello").unwrap();
        let mut index = Index::new();
        index.stage("hello.txt", blob).unwrap();
        let tree = tree_from_index(&index, &StoreSink::new(&fx.store)).unwrap();
        let commit = CommitChain::new(&fx.store)
            .commit_at(tree, None, "t", "m", 5)
            .unwrap();

        let mut checkout = fx.checkout();
        let report = checkout.assess().unwrap();
        assert_eq!(report.head_commit, None);
        assert_eq!(report.workdir_tree, EMPTY_TREE);
        assert_eq!(checkout.state(), Some(CheckoutState::Clean));

        let outcome = checkout.checkout(&commit).unwrap();
        assert_eq!(outcome.previous, None);
        assert_eq!(fx.read("hello.txt"), "hello");
        assert_eq!(fx.refs.read_ref("refs/heads/main").unwrap(), Some(commit));
    }

    #[test]
    fn unborn_repository_with_files_is_dirty() {
        let fx = Fixture::new();
        let tree = fx.store.write(&lit_store::Tree::empty().to_stored_object()).unwrap();
        let commit = CommitChain::new(&fx.store).commit_at(tree, None, "t", "m", 5).unwrap();
        fx.write("notes.txt", "mine");

        let err = fx.checkout().checkout(&commit).unwrap_err();
        assert!(matches!(err, CheckoutError::UncommittedChanges(_)));
        assert_eq!(fx.read("notes.txt"), "mine");
        assert_eq!(fx.refs.resolve_head().unwrap(), None);
    }

    #[test]
    fn detached_head_is_rewritten() {
        let fx = Fixture::new();
        let c1 = fx.commit_files(&[("a.txt", "one")], 1);
        let c2 = fx.commit_files(&[("a.txt", "two")], 2);
        fx.refs.set_head(&Head::Detached(c2)).unwrap();

        fx.checkout().checkout(&c1).unwrap();
        assert_eq!(fx.refs.head().unwrap(), Some(Head::Detached(c1)));
        assert_eq!(fx.refs.read_ref("refs/heads/main").unwrap(), Some(c2));
    }

    #[test]
    fn non_commit_target_fails_before_mutation() {
        let fx = Fixture::new();
        let c1 = fx.commit_files(&[("a.txt", "one")], 1);
        let tree = CommitChain::new(&fx.store).resolve_tree(&c1).unwrap();
        let before = fx.workdir_files();

        let err = fx.checkout().checkout(&tree).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Chain(ChainError::Store(StoreError::WrongKind { .. }))
        ));
        assert_eq!(fx.workdir_files(), before);
        assert_eq!(fx.refs.resolve_head().unwrap(), Some(c1));
    }

    #[test]
    fn ignored_directories_survive_checkout() {
        let fx = Fixture::new();
        let c1 = fx.commit_files(&[("a.txt", "one")], 1);
        fx.commit_files(&[("a.txt", "two")], 2);
        fx.write("node_modules/dep/index.js", "dep");

        fx.checkout().checkout(&c1).unwrap();
        assert_eq!(fx.read("node_modules/dep/index.js"), "dep");
        assert_eq!(fx.read("a.txt"), "one");
    }

    #[test]
    fn nested_ignored_directory_does_not_outlive_its_parent() {
        let fx = Fixture::new();
        let c1 = fx.commit_files(&[("a.txt", "one")], 1);
        let c2 = fx.commit_files(&[("a.txt", "one"), ("web/page.html", "<p>")], 2);
        fx.write("web/node_modules/dep.js", "dep");

        fx.checkout().checkout(&c1).unwrap();
        let chain = CommitChain::new(&fx.store);
        let rescanned = tree_from_workdir(fx.root(), &fx.ignore, &HashOnlySink).unwrap();
        assert_eq!(rescanned, chain.resolve_tree(&c1).unwrap());
        assert!(!fx.root().join("web").exists());

        let mut back = fx.checkout();
        back.checkout(&c2).unwrap();
        assert_eq!(back.state(), Some(CheckoutState::Done));
        let rescanned = tree_from_workdir(fx.root(), &fx.ignore, &HashOnlySink).unwrap();
        assert_eq!(rescanned, chain.resolve_tree(&c2).unwrap());
    }
}
