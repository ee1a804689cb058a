//! Creating, resolving and walking commits.

use chrono::Utc;
use lit_store::ObjectStore;
use lit_types::{ObjectId, ObjectKind};
use tracing::{debug, info};

use crate::commit::Commit;
use crate::error::{ChainError, ChainResult};

/// Commit operations over an object store.
pub struct CommitChain<'s> {
    store: &'s dyn ObjectStore,
}

impl<'s> CommitChain<'s> {
    pub fn new(store: &'s dyn ObjectStore) -> Self {
        Self { store }
    }

    /// Write a commit stamped with the current time.
    ///
    /// The timestamp has whole-second resolution, so two calls within one
    /// second with identical fields produce the same id.
    pub fn commit(
        &self,
        tree: ObjectId,
        parent: Option<ObjectId>,
        author: &str,
        message: &str,
    ) -> ChainResult<ObjectId> {
        self.commit_at(tree, parent, author, message, Utc::now().timestamp())
    }

    /// Write a commit with an explicit unix timestamp.
    ///
    /// The tree must be a stored tree and the parent, if any, a stored
    /// commit.
    pub fn commit_at(
        &self,
        tree: ObjectId,
        parent: Option<ObjectId>,
        author: &str,
        message: &str,
        date: i64,
    ) -> ChainResult<ObjectId> {
        if author.contains('\n') {
            return Err(ChainError::InvalidField {
                field: "author",
                reason: "must be a single line".into(),
            });
        }
        self.store.get_kind(&tree, ObjectKind::Tree)?;
        if let Some(parent) = &parent {
            self.store.get_kind(parent, ObjectKind::Commit)?;
        }

        let commit = Commit {
            tree,
            parent,
            author: author.to_string(),
            date,
            message: message.to_string(),
        };
        let id = self.store.write(&commit.to_stored_object())?;
        info!(
            commit = %id.short_hex(),
            tree = %tree.short_hex(),
            parent = ?parent.map(|p| p.short_hex()),
            "created commit"
        );
        Ok(id)
    }

    /// Read and decode the commit `id`.
    ///
    /// Fails with `WrongKind` if `id` is not a commit and with
    /// [`ChainError::MalformedCommit`] if it cannot be decoded.
    pub fn read(&self, id: &ObjectId) -> ChainResult<Commit> {
        let object = self.store.get_kind(id, ObjectKind::Commit)?;
        Commit::decode(&object.data).map_err(|reason| ChainError::MalformedCommit { id: *id, reason })
    }

    /// The tree id recorded in commit `id`.
    pub fn resolve_tree(&self, id: &ObjectId) -> ChainResult<ObjectId> {
        let tree = self.read(id)?.tree;
        debug!(commit = %id.short_hex(), tree = %tree.short_hex(), "resolved tree");
        Ok(tree)
    }

    /// Lazily walk from `start` through parent links, youngest first.
    pub fn walk(&self, start: ObjectId) -> CommitWalk<'s> {
        CommitWalk {
            chain: CommitChain { store: self.store },
            next: Some(start),
        }
    }
}

/// Iterator over a commit and its ancestors.
///
/// Yields each commit once. After an error the walk ends.
pub struct CommitWalk<'s> {
    chain: CommitChain<'s>,
    next: Option<ObjectId>,
}

impl Iterator for CommitWalk<'_> {
    type Item = ChainResult<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        match self.chain.read(&id) {
            Ok(commit) => {
                self.next = commit.parent;
                Some(Ok((id, commit)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl std::iter::FusedIterator for CommitWalk<'_> {}
