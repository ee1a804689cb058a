//! Error types for the index crate.

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A path is not a valid repository-relative path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A line of the index file could not be parsed.
    #[error("malformed index line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// I/O error while loading or saving the index file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
