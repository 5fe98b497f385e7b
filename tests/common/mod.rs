//! Shared harness for the HTTP integration tests: an in-memory store, the
//! full router, and helpers to seed users and send requests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use catalog_api::auth::crypto::hash_password;
use catalog_api::auth::{JwtConfig, JwtManager};
use catalog_api::http_server::{build_router, AppState, HttpServerConfig};
use catalog_api::model::{NewUser, UserRecord};
use catalog_api::repository::{collections, UserRepository};
use catalog_api::store::{
    Document, DocumentStore, Filter, FindQuery, MemoryStore, StoreError, StoreHandle,
    StoreResult,
};

pub const PASSWORD: &str = "correct horse";

pub struct TestApp {
    pub router: Router,
    pub store: StoreHandle,
    pub jwt: JwtManager,
}

pub fn memory_store() -> StoreHandle {
    Arc::new(MemoryStore::new("http-test", collections()).unwrap())
}

/// Memory store whose bulk deletes always fail, as if the connection had
/// dropped between two writes
pub struct FailingBulkDelete(pub MemoryStore);

impl FailingBulkDelete {
    pub fn handle() -> StoreHandle {
        Arc::new(Self(MemoryStore::new("failing-test", collections()).unwrap()))
    }
}

#[async_trait]
impl DocumentStore for FailingBulkDelete {
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<Document> {
        self.0.insert(collection, document).await
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.0.find_by_id(collection, id).await
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> StoreResult<Vec<Document>> {
        self.0.find(collection, query).await
    }

    async fn count(&self, collection: &str, filter: &[Filter]) -> StoreResult<u64> {
        self.0.count(collection, filter).await
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> StoreResult<Option<Document>> {
        self.0.update_by_id(collection, id, changes).await
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<bool> {
        self.0.delete_by_id(collection, id).await
    }

    async fn delete_many(&self, _collection: &str, _filter: &[Filter]) -> StoreResult<u64> {
        Err(StoreError::Closed)
    }

    async fn close(&self) {
        self.0.close().await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(memory_store(), 3)
    }

    /// Full router over `store`, listing `page_size` products per page
    pub fn with_store(store: StoreHandle, page_size: u64) -> Self {
        let jwt = JwtManager::new(JwtConfig {
            secret: "integration-secret".to_string(),
            access_token_ttl: chrono::Duration::hours(1),
            issuer: "catalog-api".to_string(),
            audience: "catalog-api".to_string(),
        });
        let state = AppState::new(store.clone(), jwt.clone(), page_size);
        let router = build_router(&HttpServerConfig::default(), state);

        Self { router, store, jwt }
    }

    /// Insert a user directly through the repository
    pub async fn seed_user(&self, email: &str) -> UserRecord {
        UserRepository::new(self.store.clone())
            .create(NewUser {
                email: email.to_string(),
                first_name: "Seed".to_string(),
                last_name: "User".to_string(),
                avatar: None,
                password: hash_password(PASSWORD).unwrap(),
            })
            .await
            .unwrap()
    }

    /// A valid bearer token for `user`
    pub fn token(&self, user: &UserRecord) -> String {
        self.jwt.issue(user).unwrap().token
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.dispatch(builder.body(body).unwrap()).await
    }

    pub async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Create a product through the API and return its id
    pub async fn create_product(&self, token: &str, name: &str, owner_id: &str) -> String {
        let response = self
            .post(
                "/api/v1/products/create",
                token,
                serde_json::json!({
                    "name": name,
                    "year": 2020,
                    "price": 10.5,
                    "userId": owner_id,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.json()["_id"].as_str().unwrap().to_string()
    }
}
