//! # Product Repository
//!
//! Product reads can resolve the owning user into an embedded view.

use crate::model::{
    ProductFields, ProductRecord, ProductView, UserRecord, OWNER_FIELD, PRODUCTS, USERS,
};
use crate::store::{Filter, FindQuery, StoreHandle};

use super::errors::RepositoryResult;
use super::pagination::{Listing, PageRequest};
use super::{from_document, to_document, to_new_document};

/// Store-backed product operations
#[derive(Clone)]
pub struct ProductRepository {
    store: StoreHandle,
}

impl ProductRepository {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Persist a new product. The store rejects unknown owners.
    pub async fn create(&self, fields: ProductFields) -> RepositoryResult<ProductRecord> {
        let doc = self
            .store
            .insert(PRODUCTS, to_new_document(&fields)?)
            .await?;
        from_document(doc)
    }

    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<ProductRecord>> {
        self.store
            .find_by_id(PRODUCTS, id)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Look up a product and embed its owner.
    ///
    /// When the owner no longer exists the view keeps the bare id.
    pub async fn find_by_id_with_owner(&self, id: &str) -> RepositoryResult<Option<ProductView>> {
        let Some(product) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let owner: Option<UserRecord> = self
            .store
            .find_by_id(USERS, &product.user)
            .await?
            .map(from_document)
            .transpose()?;

        Ok(Some(match owner {
            Some(owner) => ProductView::with_owner(product, owner.into()),
            None => ProductView::from(product),
        }))
    }

    /// Products in creation order, optionally for one owner and one page.
    ///
    /// `total` counts every match, not just the returned page.
    pub async fn find_all(
        &self,
        owner: Option<&str>,
        page: Option<PageRequest>,
    ) -> RepositoryResult<Listing<ProductRecord>> {
        let filter: Vec<Filter> = owner
            .map(|user_id| Filter::eq(OWNER_FIELD, user_id))
            .into_iter()
            .collect();

        let (query, total) = match page {
            Some(page) => {
                let total = self.store.count(PRODUCTS, &filter).await?;
                let query = FindQuery::filtered(filter)
                    .window(page.offset() as usize, page.per_page as usize);
                (query, Some(total))
            }
            None => (FindQuery::filtered(filter), None),
        };

        let items = self
            .store
            .find(PRODUCTS, &query)
            .await?
            .into_iter()
            .map(from_document)
            .collect::<RepositoryResult<Vec<ProductRecord>>>()?;
        let total = total.unwrap_or(items.len() as u64);

        Ok(Listing { items, total })
    }

    /// Overwrite every mutable field of a product
    pub async fn update_by_id(
        &self,
        id: &str,
        fields: ProductFields,
    ) -> RepositoryResult<Option<ProductRecord>> {
        self.store
            .update_by_id(PRODUCTS, id, to_document(&fields)?)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn delete_by_id(&self, id: &str) -> RepositoryResult<bool> {
        Ok(self.store.delete_by_id(PRODUCTS, id).await?)
    }

    /// Delete every product owned by `user_id`, returning how many went
    pub async fn delete_by_owner(&self, user_id: &str) -> RepositoryResult<u64> {
        Ok(self
            .store
            .delete_many(PRODUCTS, &[Filter::eq(OWNER_FIELD, user_id)])
            .await?)
    }
}
