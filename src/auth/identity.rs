//! # Caller Identity
//!
//! The authenticated caller, decoded from a verified access token.
//! [`require_auth`](super::middleware::require_auth) inserts it into the
//! request extensions and handlers extract it through [`FromRequestParts`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::errors::AuthError;

/// Who is calling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_extracts_from_extensions() {
        let identity = Identity {
            user_id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
        };
        let (mut parts, _) = Request::builder()
            .extension(identity.clone())
            .body(())
            .unwrap()
            .into_parts();

        let extracted = Identity::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, identity);
    }

    #[tokio::test]
    async fn test_missing_identity_is_rejected() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();

        let result = Identity::from_request_parts(&mut parts, &()).await;
        assert_eq!(result, Err(AuthError::MissingCredentials));
    }
}
