//! catalog-api - users and products over a JWT-protected REST API
//!
//! Layers, bottom up: document store, models, repositories, validation,
//! auth, HTTP server, CLI.

pub mod auth;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod model;
pub mod repository;
pub mod store;
pub mod validation;
