use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not a lit repository (or any parent): {0}")]
    NotInitialized(String),

    #[error("cannot commit with a detached HEAD; check out a branch first")]
    DetachedHeadCommit,

    #[error("{0} has no commits yet")]
    NoRef(String),

    #[error("unknown revision: {0}")]
    UnknownRevision(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] lit_store::StoreError),

    #[error("index error: {0}")]
    Index(#[from] lit_index::IndexError),

    #[error("tree error: {0}")]
    Tree(#[from] lit_tree::TreeError),

    #[error("ref error: {0}")]
    Ref(#[from] lit_refs::RefError),

    #[error("commit error: {0}")]
    Chain(#[from] lit_chain::ChainError),

    #[error("checkout failed: {0}")]
    Checkout(#[from] lit_checkout::CheckoutError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
