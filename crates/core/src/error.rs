/// Domain-level error shared by the reconciliation core and its storage
/// collaborators.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A proposed field value failed schema or type rules.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A conditional write found the row changed underneath it.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Opaque failure raised by the storage collaborator.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
