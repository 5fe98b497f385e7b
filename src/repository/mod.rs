//! # Entity Repositories
//!
//! Thin typed operations over the injected store handle. Records are
//! encoded to and decoded from store documents with serde.

pub mod errors;
pub mod pagination;
pub mod products;
pub mod users;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::model::{OWNER_FIELD, PRODUCTS, USERS};
use crate::store::{CollectionSpec, Document};

pub use errors::{RepositoryError, RepositoryResult};
pub use pagination::{Listing, PageEnvelope, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use products::ProductRepository;
pub use users::UserRepository;

/// Collections and constraints the repositories rely on
pub fn collections() -> Vec<CollectionSpec> {
    vec![
        CollectionSpec::new(USERS).unique("email"),
        CollectionSpec::new(PRODUCTS).reference(OWNER_FIELD, USERS),
    ]
}

/// Encode a value as a document, keeping `null` fields
fn to_document<T: Serialize>(value: &T) -> RepositoryResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(RepositoryError::Encode(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Encode a value for insertion; `null` fields are left out
fn to_new_document<T: Serialize>(value: &T) -> RepositoryResult<Document> {
    let mut doc = to_document(value)?;
    doc.retain(|_, v| !v.is_null());
    Ok(doc)
}

fn from_document<T: DeserializeOwned>(doc: Document) -> RepositoryResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Sample {
        name: &'static str,
        note: Option<&'static str>,
    }

    #[test]
    fn test_to_document_keeps_nulls() {
        let doc = to_document(&Sample {
            name: "a",
            note: None,
        })
        .unwrap();
        assert_eq!(doc.get("note"), Some(&Value::Null));
    }

    #[test]
    fn test_to_new_document_drops_nulls() {
        let doc = to_new_document(&Sample {
            name: "a",
            note: None,
        })
        .unwrap();
        assert!(doc.get("note").is_none());
        assert_eq!(doc["name"], json!("a"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            to_document(&vec![1, 2]),
            Err(RepositoryError::Encode(_))
        ));
    }
}
