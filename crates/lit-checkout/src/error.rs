use lit_chain::ChainError;
use lit_index::IndexError;
use lit_refs::RefError;
use lit_store::StoreError;
use lit_tree::TreeError;

use crate::report::DirtyReport;

/// Errors from assessing or performing a checkout.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The dirty gate failed; nothing was modified.
    #[error("uncommitted changes: {0}")]
    UncommittedChanges(Box<DirtyReport>),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Refs(#[from] RefError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;
