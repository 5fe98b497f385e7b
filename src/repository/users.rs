//! # User Repository

use crate::model::{NewUser, UserRecord, USERS};
use crate::store::{Filter, FindQuery, StoreHandle};

use super::errors::RepositoryResult;
use super::{from_document, to_new_document};

/// Store-backed user operations
#[derive(Clone)]
pub struct UserRepository {
    store: StoreHandle,
}

impl UserRepository {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Persist a new user; the password must already be hashed
    pub async fn create(&self, user: NewUser) -> RepositoryResult<UserRecord> {
        let doc = self.store.insert(USERS, to_new_document(&user)?).await?;
        from_document(doc)
    }

    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<UserRecord>> {
        self.store
            .find_by_id(USERS, id)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<UserRecord>> {
        let query = FindQuery::filtered(vec![Filter::eq("email", email)]).window(0, 1);
        self.store
            .find(USERS, &query)
            .await?
            .into_iter()
            .next()
            .map(from_document)
            .transpose()
    }

    /// Every user in creation order
    pub async fn find_all(&self) -> RepositoryResult<Vec<UserRecord>> {
        self.store
            .find(USERS, &FindQuery::all())
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Delete a user; `false` when it did not exist.
    ///
    /// Products owned by the user are not touched here.
    pub async fn delete_by_id(&self, id: &str) -> RepositoryResult<bool> {
        Ok(self.store.delete_by_id(USERS, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{collections, RepositoryError};
    use crate::store::{MemoryStore, StoreError};
    use std::sync::Arc;

    fn create_test_repo() -> UserRepository {
        let store = MemoryStore::new("users-test", collections()).unwrap();
        UserRepository::new(Arc::new(store))
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            avatar: None,
            password: "hashed".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = create_test_repo();
        let created = repo.create(new_user("ada@example.com")).await.unwrap();

        let by_id = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let by_email = repo.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(created.id));

        assert!(repo.find_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_store_failure() {
        let repo = create_test_repo();
        repo.create(new_user("ada@example.com")).await.unwrap();

        let result = repo.create(new_user("ada@example.com")).await;
        assert!(matches!(
            result,
            Err(RepositoryError::Store(StoreError::DuplicateKey { .. }))
        ));
    }

    #[tokio::test]
    async fn test_find_all_in_creation_order() {
        let repo = create_test_repo();
        for email in ["a@x.io", "b@x.io", "c@x.io"] {
            repo.create(new_user(email)).await.unwrap();
        }

        let emails: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, vec!["a@x.io", "b@x.io", "c@x.io"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = create_test_repo();
        let created = repo.create(new_user("ada@example.com")).await.unwrap();

        assert!(repo.delete_by_id(&created.id).await.unwrap());
        assert!(repo.find_by_id(&created.id).await.unwrap().is_none());
        assert!(!repo.delete_by_id(&created.id).await.unwrap());
    }
}
