use lit_types::{ObjectId, ObjectKind};

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object exists at the requested address.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// Stored bytes failed to decompress, or the header or body is malformed.
    #[error("corrupt object {id}: {reason}")]
    Corrupt { id: ObjectId, reason: String },

    /// Stored bytes decode cleanly but hash to a different id.
    #[error("hash mismatch for {id}: content hashes to {computed}")]
    HashMismatch { id: ObjectId, computed: ObjectId },

    /// The object exists but is not of the kind the caller asked for.
    #[error("object {id} is a {actual}, not a {expected}")]
    WrongKind {
        id: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    /// A tree entry failed validation while being built.
    #[error("invalid tree entry: {0}")]
    InvalidEntry(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
