//! Checkout states, the comparison policy and the dirty report.

use std::fmt;

use lit_crypto::EMPTY_TREE;
use lit_types::ObjectId;
use serde::{Deserialize, Serialize};

/// Where a checkout currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutState {
    /// The dirty gate passed; no mutation has happened yet.
    Clean,
    /// The dirty gate failed; the checkout stops here.
    Dirty,
    /// The working directory is being rewritten.
    Materializing,
    /// Files are written and HEAD moved.
    Done,
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Clean => "clean",
            Self::Dirty => "dirty",
            Self::Materializing => "materializing",
            Self::Done => "done",
        })
    }
}

/// Which comparisons against HEAD's tree block a checkout.
///
/// With commits present, the working tree is always compared. The index is
/// compared only under [`CheckoutPolicy::WorkingTreeAndIndex`], since
/// checkout itself never rewrites the index. With no commits, both trees
/// must be empty under either policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckoutPolicy {
    #[default]
    WorkingTreeOnly,
    WorkingTreeAndIndex,
}

impl CheckoutPolicy {
    /// Policy for the `enforce_index` config switch.
    pub fn from_enforce_index(enforce_index: bool) -> Self {
        if enforce_index {
            Self::WorkingTreeAndIndex
        } else {
            Self::WorkingTreeOnly
        }
    }
}

/// The three tree ids the dirty gate compares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtyReport {
    /// Commit HEAD resolves to, absent before the first commit.
    pub head_commit: Option<ObjectId>,
    /// HEAD's tree, or the empty tree before the first commit.
    pub head_tree: ObjectId,
    /// Tree hashed from the staging index.
    pub index_tree: ObjectId,
    /// Tree hashed from the working directory.
    pub workdir_tree: ObjectId,
    pub policy: CheckoutPolicy,
}

impl DirtyReport {
    /// Returns `true` if the working directory differs from HEAD's tree.
    pub fn workdir_changed(&self) -> bool {
        self.workdir_tree != self.head_tree
    }

    /// Returns `true` if the index differs from HEAD's tree.
    pub fn index_changed(&self) -> bool {
        self.index_tree != self.head_tree
    }

    /// Whether the gate fails under the report's policy.
    pub fn is_dirty(&self) -> bool {
        if self.head_commit.is_none() {
            return self.workdir_tree != EMPTY_TREE || self.index_tree != EMPTY_TREE;
        }
        match self.policy {
            CheckoutPolicy::WorkingTreeOnly => self.workdir_changed(),
            CheckoutPolicy::WorkingTreeAndIndex => self.workdir_changed() || self.index_changed(),
        }
    }

    /// The gate outcome as a state.
    pub fn state(&self) -> CheckoutState {
        if self.is_dirty() {
            CheckoutState::Dirty
        } else {
            CheckoutState::Clean
        }
    }
}

impl fmt::Display for DirtyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.head_commit.is_none() {
            return write!(
                f,
                "no commits yet and the working directory or index is not empty"
            );
        }
        let mut parts = Vec::new();
        if self.workdir_changed() {
            parts.push("working directory differs from HEAD");
        }
        if self.index_changed() {
            parts.push("index differs from HEAD");
        }
        if parts.is_empty() {
            parts.push("no changes");
        }
        f.write_str(&parts.join("; "))
    }
}
