//! # HTTP Server
//!
//! Combines the user, product and health routers into one service, serves
//! it until the shutdown signal fires, then closes the store.

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use axum::{http::StatusCode, response::IntoResponse, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::store::StoreHandle;

use super::config::HttpServerConfig;
use super::health_routes::health_routes;
use super::product_routes::product_routes;
use super::state::AppState;
use super::user_routes::user_routes;

/// Prefix every resource route is mounted under
pub const API_PREFIX: &str = "/api/v1";

/// HTTP server over an open store
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
    store: StoreHandle,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: AppState, store: StoreHandle) -> Self {
        let router = build_router(&config, state);
        Self {
            config,
            router,
            store,
        }
    }

    /// Serve until `shutdown` resolves, then close the store
    pub async fn start<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self.config.bind_addr().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {e}", self.config.socket_addr()),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, prefix = API_PREFIX, "HTTP server listening");

        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await;

        self.store.close().await;
        tracing::info!("store closed, HTTP server stopped");

        served
    }
}

/// Build the full router: API routes, health probe, fallback and layers
pub fn build_router(config: &HttpServerConfig, state: AppState) -> Router {
    let api = Router::new()
        .nest("/users", user_routes(state.clone()))
        .nest("/products", product_routes(state));

    Router::new()
        .merge(health_routes())
        .nest(API_PREFIX, api)
        .fallback(not_found_handler)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "NOT FOUND, CHECK YOUR ENDPOINT URL")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, JwtManager};
    use crate::repository::collections;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> (AppState, StoreHandle) {
        let store: StoreHandle = Arc::new(MemoryStore::new("server-test", collections()).unwrap());
        let jwt = JwtManager::new(JwtConfig {
            secret: "server-test-secret".to_string(),
            access_token_ttl: chrono::Duration::hours(1),
            issuer: "catalog-api".to_string(),
            audience: "catalog-api".to_string(),
        });
        (AppState::new(store.clone(), jwt, 3), store)
    }

    async fn allowed_origin(config: &HttpServerConfig, origin: &str) -> Option<String> {
        let (state, _) = test_state();
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let response = build_router(config, state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origins_only() {
        let config = HttpServerConfig::default();
        assert_eq!(
            allowed_origin(&config, "http://localhost").await.as_deref(),
            Some("http://localhost")
        );
        assert_eq!(allowed_origin(&config, "http://evil.example").await, None);
    }

    #[tokio::test]
    async fn test_cors_is_permissive_without_origins() {
        let config = HttpServerConfig {
            cors_origins: Vec::new(),
            ..Default::default()
        };
        assert_eq!(
            allowed_origin(&config, "http://anywhere.example").await.as_deref(),
            Some("*")
        );
    }

    #[tokio::test]
    async fn test_start_rejects_bad_address() {
        let config = HttpServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        let (state, store) = test_state();
        let result = HttpServer::new(config, state, store).start(async {}).await;
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }
}
