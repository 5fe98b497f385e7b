//! # Document Store
//!
//! The seam between the repositories and the database. Documents are JSON
//! objects carrying a store-assigned `_id` and a `__v` version counter.
//!
//! The store handle is opened once at process start with [`connect`],
//! injected into the repositories, and closed at shutdown.

pub mod errors;
pub mod filter;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use errors::{StoreError, StoreResult};
pub use filter::{Filter, FilterOperator, FindQuery};
pub use memory::MemoryStore;

/// A stored document
pub type Document = Map<String, Value>;

/// Field holding the store-assigned identifier
pub const ID_FIELD: &str = "_id";

/// Field holding the store-maintained version counter
pub const VERSION_FIELD: &str = "__v";

/// Shared handle to an open store
pub type StoreHandle = Arc<dyn DocumentStore>;

/// Operations the repositories need from a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning it with `_id` and `__v` assigned
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<Document>;

    /// Look up a document by `_id`
    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Matching documents in insertion order, windowed by skip/limit
    async fn find(&self, collection: &str, query: &FindQuery) -> StoreResult<Vec<Document>>;

    /// Number of documents matching every filter
    async fn count(&self, collection: &str, filter: &[Filter]) -> StoreResult<u64>;

    /// Apply field changes to a document and bump its version.
    ///
    /// A `null` value removes the field. Returns `None` when no document
    /// has this id.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> StoreResult<Option<Document>>;

    /// Delete one document; `false` when it did not exist
    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<bool>;

    /// Delete every matching document, returning how many were removed
    async fn delete_many(&self, collection: &str, filter: &[Filter]) -> StoreResult<u64>;

    /// Release the connection. Later calls fail with [`StoreError::Closed`].
    async fn close(&self);
}

/// A field whose value must be the `_id` of a record in another collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub field: &'static str,
    pub target: &'static str,
}

/// Constraints declared for one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub unique: Vec<&'static str>,
    pub references: Vec<Reference>,
}

impl CollectionSpec {
    /// Collection without constraints
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            unique: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Require values of `field` to be unique across the collection
    pub fn unique(mut self, field: &'static str) -> Self {
        self.unique.push(field);
        self
    }

    /// Require `field` to hold the id of an existing `target` record
    pub fn reference(mut self, field: &'static str, target: &'static str) -> Self {
        self.references.push(Reference { field, target });
        self
    }
}

/// Store connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Connection string, e.g. `memory://default`
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    "memory://default".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

/// Open a store for the given connection string.
///
/// Only the in-process `memory://<name>` backend is built in.
pub async fn connect(
    config: &StoreConfig,
    collections: Vec<CollectionSpec>,
) -> StoreResult<StoreHandle> {
    match config.url.strip_prefix("memory://") {
        Some(name) if !name.is_empty() => {
            let store = MemoryStore::new(name, collections)?;
            tracing::info!(store = store.name(), "connected to in-memory document store");
            Ok(Arc::new(store))
        }
        _ => Err(StoreError::UnsupportedUrl(config.url.clone())),
    }
}
