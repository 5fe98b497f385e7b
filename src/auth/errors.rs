//! Failures raised while reading, verifying or minting credentials.
//!
//! Display strings never name the account or the check that failed.

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No usable `Authorization` header
    #[error("Authentication required")]
    MissingCredentials,

    /// Login password did not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Undecodable token, unknown scheme, or wrong issuer/audience
    #[error("Malformed token")]
    MalformedToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Internal error: password hashing failed")]
    HashingFailed,

    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,
}

impl AuthError {
    /// 401 when the caller's credential is at fault, 500 otherwise
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingCredentials
            | AuthError::InvalidCredentials
            | AuthError::MalformedToken
            | AuthError::TokenExpired
            | AuthError::InvalidSignature => 401,
            AuthError::HashingFailed | AuthError::TokenGenerationFailed => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
