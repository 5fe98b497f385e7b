//! # HTTP Server Module
//!
//! The REST surface of the catalog service, built on axum.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/v1/users/*` - User registration, lookup, removal and login
//! - `/api/v1/products/*` - Product catalog

pub mod config;
pub mod error;
pub mod extract;
pub mod health_routes;
pub mod product_routes;
pub mod server;
pub mod state;
pub mod user_routes;

pub use config::HttpServerConfig;
pub use error::{ApiError, ErrorContext};
pub use server::{build_router, HttpServer, API_PREFIX};
pub use state::AppState;
