//! # Auth Module
//!
//! Password hashing, JWT access tokens and the bearer middleware that
//! guards every protected route.

pub mod crypto;
pub mod errors;
pub mod identity;
pub mod jwt;
pub mod middleware;

pub use errors::{AuthError, AuthResult};
pub use identity::Identity;
pub use jwt::{IssuedToken, JwtClaims, JwtConfig, JwtManager};
pub use middleware::require_auth;
