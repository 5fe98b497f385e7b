//! # Product Model
//!
//! Stored product record, the fields written on create/update, the partial
//! update merge, and the client view (optionally with the owner resolved).

use serde::{Deserialize, Serialize};

use super::user::UserView;

/// Collection holding products
pub const PRODUCTS: &str = "products";

/// Field referencing the owning user
pub const OWNER_FIELD: &str = "user";

/// Product as persisted in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    pub year: i64,

    #[serde(default)]
    pub price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Owning user id
    pub user: String,

    #[serde(rename = "__v", default)]
    pub version: u64,
}

/// Every mutable product field, as written on create and on update.
///
/// A `None` description is written as `null`, which removes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductFields {
    pub name: String,
    pub year: i64,
    pub price: f64,
    pub description: Option<String>,
    pub user: String,
}

impl From<&ProductRecord> for ProductFields {
    fn from(record: &ProductRecord) -> Self {
        Self {
            name: record.name.clone(),
            year: record.year,
            price: record.price,
            description: record.description.clone(),
            user: record.user.clone(),
        }
    }
}

/// Partial update: only supplied, truthy values replace stored ones
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
}

fn text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl ProductPatch {
    /// Merge this patch over the stored record.
    ///
    /// Empty strings and zero numbers count as absent.
    pub fn merge_onto(self, current: &ProductRecord) -> ProductFields {
        let current = ProductFields::from(current);

        ProductFields {
            name: text(self.name).unwrap_or(current.name),
            year: self.year.filter(|y| *y != 0).unwrap_or(current.year),
            price: self.price.filter(|p| *p != 0.0).unwrap_or(current.price),
            description: text(self.description).or(current.description),
            user: text(self.user_id).unwrap_or(current.user),
        }
    }
}

/// Owner reference in a product view: a bare id or the resolved user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerRef {
    Resolved(UserView),
    Id(String),
}

/// Client-facing projection of a product: no version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub year: i64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user: OwnerRef,
}

impl ProductView {
    /// View with the owner embedded
    pub fn with_owner(record: ProductRecord, owner: UserView) -> Self {
        let mut view = Self::from(record);
        view.user = OwnerRef::Resolved(owner);
        view
    }
}

impl From<ProductRecord> for ProductView {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            year: record.year,
            price: record.price,
            description: record.description,
            user: OwnerRef::Id(record.user),
        }
    }
}
