use lit_store::StoreError;
use lit_types::ObjectId;

/// Errors from commit encoding, decoding and traversal.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// A commit object lacks a required header or has an unparsable one.
    #[error("malformed commit {id}: {reason}")]
    MalformedCommit { id: ObjectId, reason: String },

    /// A field cannot be written into a commit header.
    #[error("invalid commit field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Store failure, including `WrongKind` when an id is not a commit.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for commit chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
