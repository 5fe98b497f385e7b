//! Shared, immutable request state.

use std::sync::Arc;

use crate::auth::JwtManager;
use crate::repository::{ProductRepository, UserRepository};
use crate::store::StoreHandle;

/// Everything a handler needs: repositories over the open store, the token
/// manager and the configured page size
#[derive(Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub products: ProductRepository,
    pub jwt: Arc<JwtManager>,
    pub page_size: u64,
}

impl AppState {
    pub fn new(store: StoreHandle, jwt: JwtManager, page_size: u64) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            products: ProductRepository::new(store),
            jwt: Arc::new(jwt),
            page_size,
        }
    }
}
