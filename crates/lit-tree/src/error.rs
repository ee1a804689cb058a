//! Error types for tree construction and materialization.

use lit_index::IndexError;
use lit_store::StoreError;

/// Errors that can occur while building or materializing trees.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// One path name would be both a file and a directory.
    #[error("path conflict: {0} is both a file and a directory")]
    PathConflict(String),

    /// A path found on disk or in a tree cannot be represented.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Object store failure (missing, corrupt or wrong-kind objects).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Index path validation failure.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Directory traversal failure.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// I/O error while reading or writing the working directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for tree results.
pub type TreeResult<T> = Result<T, TreeError>;
