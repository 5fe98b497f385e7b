//! # Store Errors
//!
//! Failures reported by the document store itself. Everything in this enum
//! is treated as a store-reported failure by the HTTP layer.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a [`DocumentStore`](super::DocumentStore)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique field already holds this value
    #[error("duplicate key in {collection}.{field}: {value}")]
    DuplicateKey {
        collection: String,
        field: String,
        value: String,
    },

    /// A reference field points at a record that does not exist
    #[error("{collection}.{field} references missing {target} record {value}")]
    MissingReference {
        collection: String,
        field: String,
        target: String,
        value: String,
    },

    /// Collection was never declared when the store was opened
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// Connection string not understood by any backend
    #[error("unsupported store url: {0}")]
    UnsupportedUrl(String),

    /// Handle used after `close()`
    #[error("store connection is closed")]
    Closed,
}
