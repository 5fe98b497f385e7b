//! # Bearer Authentication Middleware
//!
//! Every protected route is wrapped with [`require_auth`]. It reads the
//! `Authorization` header, verifies the token and stores the decoded
//! [`Identity`] in the request extensions. Requests without a valid token
//! are answered with 401 before any extractor or handler runs.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::errors::{AuthError, AuthResult};
use super::identity::Identity;
use super::jwt::JwtManager;

/// Pull the token out of an `Authorization` header value.
///
/// Accepts `Bearer <token>` as well as a bare token.
pub fn bearer_token(header_value: &str) -> AuthResult<&str> {
    let value = header_value.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return Err(AuthError::MalformedToken),
        None => value,
    };

    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}

/// Verify the caller's credential from request headers
pub fn authenticate(jwt: &JwtManager, request: &Request) -> AuthResult<Identity> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedToken)?;

    jwt.verify(bearer_token(header_value)?)
}

/// Reject unauthenticated requests, otherwise attach the caller's identity
pub async fn require_auth(
    State(jwt): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&jwt, &request) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                reason = %err,
                method = %request.method(),
                path = %request.uri().path(),
                "authentication failed"
            );
            err.into_response()
        }
    }
}
