//! # In-Memory Document Store
//!
//! Process-local backend for `memory://` urls. Collections keep insertion
//! order, which is the order `find` returns documents in.
//!
//! Constraints are checked under the same write lock that applies the
//! change, so a rejected write leaves the collection untouched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::filter::{matches_all, Filter, FindQuery};
use super::{CollectionSpec, Document, DocumentStore, ID_FIELD, VERSION_FIELD};

type Collections = HashMap<String, Vec<Document>>;

/// In-memory document store
#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    specs: HashMap<String, CollectionSpec>,
    collections: RwLock<Collections>,
    closed: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store with the given collections declared.
    ///
    /// Fails when a reference targets an undeclared collection.
    pub fn new(name: impl Into<String>, specs: Vec<CollectionSpec>) -> StoreResult<Self> {
        let specs: HashMap<String, CollectionSpec> = specs
            .into_iter()
            .map(|spec| (spec.name.to_string(), spec))
            .collect();

        for spec in specs.values() {
            if let Some(reference) = spec
                .references
                .iter()
                .find(|r| !specs.contains_key(r.target))
            {
                return Err(StoreError::UnknownCollection(reference.target.to_string()));
            }
        }

        let collections = specs.keys().map(|name| (name.clone(), Vec::new())).collect();

        Ok(Self {
            name: name.into(),
            specs,
            collections: RwLock::new(collections),
            closed: AtomicBool::new(false),
        })
    }

    /// Name given in the connection url
    pub fn name(&self) -> &str {
        &self.name
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    fn spec(&self, collection: &str) -> StoreResult<&CollectionSpec> {
        self.ensure_open()?;
        self.specs
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
    }
}

fn id_of(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

fn display(value: &Value) -> String {
    value
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

/// Check unique and reference constraints for a document about to be written
fn check_constraints(
    spec: &CollectionSpec,
    all: &Collections,
    candidate: &Document,
) -> StoreResult<()> {
    let candidate_id = id_of(candidate);
    let docs = all.get(spec.name).map(Vec::as_slice).unwrap_or_default();

    for field in &spec.unique {
        let Some(value) = candidate.get(*field).filter(|v| !v.is_null()) else {
            continue;
        };
        let taken = docs
            .iter()
            .any(|doc| id_of(doc) != candidate_id && doc.get(*field) == Some(value));
        if taken {
            return Err(StoreError::DuplicateKey {
                collection: spec.name.to_string(),
                field: field.to_string(),
                value: display(value),
            });
        }
    }

    for reference in &spec.references {
        let Some(value) = candidate.get(reference.field).filter(|v| !v.is_null()) else {
            continue;
        };
        let exists = match (value.as_str(), all.get(reference.target)) {
            (Some(target_id), Some(targets)) => {
                targets.iter().any(|doc| id_of(doc) == Some(target_id))
            }
            _ => false,
        };
        if !exists {
            return Err(StoreError::MissingReference {
                collection: spec.name.to_string(),
                field: reference.field.to_string(),
                target: reference.target.to_string(),
                value: display(value),
            });
        }
    }

    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, mut document: Document) -> StoreResult<Document> {
        let spec = self.spec(collection)?;

        document.insert(ID_FIELD.to_string(), Value::from(Uuid::new_v4().to_string()));
        document.insert(VERSION_FIELD.to_string(), Value::from(0u64));

        let mut all = self.collections.write().await;
        check_constraints(spec, &all, &document)?;

        all.entry(collection.to_string())
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.spec(collection)?;
        let all = self.collections.read().await;

        Ok(all
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| id_of(doc) == Some(id)))
            .cloned())
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> StoreResult<Vec<Document>> {
        self.spec(collection)?;
        let all = self.collections.read().await;
        let docs = all.get(collection).map(Vec::as_slice).unwrap_or_default();

        Ok(docs
            .iter()
            .filter(|doc| matches_all(&query.filter, doc))
            .skip(query.skip)
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self, collection: &str, filter: &[Filter]) -> StoreResult<u64> {
        self.spec(collection)?;
        let all = self.collections.read().await;
        let docs = all.get(collection).map(Vec::as_slice).unwrap_or_default();

        Ok(docs.iter().filter(|doc| matches_all(filter, doc)).count() as u64)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> StoreResult<Option<Document>> {
        let spec = self.spec(collection)?;
        let mut all = self.collections.write().await;

        let Some((position, current)) = all.get(collection).and_then(|docs| {
            docs.iter()
                .enumerate()
                .find(|(_, doc)| id_of(doc) == Some(id))
        }) else {
            return Ok(None);
        };

        let mut candidate = current.clone();
        for (field, value) in changes {
            if field == ID_FIELD || field == VERSION_FIELD {
                continue;
            }
            if value.is_null() {
                candidate.remove(&field);
            } else {
                candidate.insert(field, value);
            }
        }
        let version = candidate
            .get(VERSION_FIELD)
            .and_then(Value::as_u64)
            .unwrap_or(0);
        candidate.insert(VERSION_FIELD.to_string(), Value::from(version + 1));

        check_constraints(spec, &all, &candidate)?;

        if let Some(slot) = all
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(position))
        {
            *slot = candidate.clone();
        }
        Ok(Some(candidate))
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<bool> {
        self.spec(collection)?;
        let mut all = self.collections.write().await;

        let Some(docs) = all.get_mut(collection) else {
            return Ok(false);
        };
        match docs.iter().position(|doc| id_of(doc) == Some(id)) {
            Some(position) => {
                docs.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_many(&self, collection: &str, filter: &[Filter]) -> StoreResult<u64> {
        self.spec(collection)?;
        let mut all = self.collections.write().await;

        let Some(docs) = all.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|doc| !matches_all(filter, doc));
        Ok((before - docs.len()) as u64)
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::info!(store = %self.name, "document store closed");
        }
    }
}
