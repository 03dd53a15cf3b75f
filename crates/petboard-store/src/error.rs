use petboard_types::PetRef;

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record matches the given reference.
    #[error("pet not found: {0}")]
    NotFound(PetRef),

    /// The persisted document is not a well-formed record array.
    #[error("malformed document {path}: {reason}")]
    Parse { path: String, reason: String },

    /// Serialization failure while writing the document.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
