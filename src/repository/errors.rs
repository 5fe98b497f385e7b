//! # Repository Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures of a repository call
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reported by the store (constraint, connection, collection)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored document did not have the expected shape
    #[error("stored document could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// A value could not be turned into a document
    #[error("value could not be encoded as a document: {0}")]
    Encode(String),
}

impl RepositoryError {
    /// Whether the store itself reported this failure
    pub fn is_store_reported(&self) -> bool {
        matches!(self, RepositoryError::Store(_))
    }
}
