//! # API Errors
//!
//! [`ApiError`] is the only error a handler returns. Failures raised while
//! serving a request go through an [`ErrorContext`], which logs the detail
//! with the operation's parameters and replaces it with a generic sentence:
//!
//! - failures reported by the store answer 400
//!   `Database error when try to <action> <module>, see logs for more details`
//! - anything else answers 500
//!   `Error when try to <action> <module>, see logs for more details.`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;

use crate::auth::AuthError;
use crate::repository::RepositoryError;
use crate::validation::Violation;

/// Body of a 400 validation response
#[derive(Debug, Serialize)]
pub struct ValidationBody {
    pub errors: Vec<Violation>,
}

/// Error returned from handlers and extractors
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more request fields broke a rule (400)
    #[error("request validation failed")]
    Validation(Vec<Violation>),

    /// Body or parameters could not be parsed (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing or rejected bearer credential (401)
    #[error("Unauthorized")]
    Unauthenticated,

    /// Login with a wrong password (401)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No such record (404, empty body)
    #[error("not found")]
    NotFound,

    /// Store-reported failure, already reduced to a generic message (400)
    #[error("{0}")]
    StoreFailure(String),

    /// Any other failure, already reduced to a generic message (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) | Self::StoreFailure(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Validation(errors) => (status, Json(ValidationBody { errors })).into_response(),
            Self::NotFound => status.into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_client_error() {
            Self::Unauthenticated
        } else {
            tracing::error!(error = %err, "authentication failed internally");
            Self::Internal(
                "Error when try to authenticate the request, see logs for more details.".into(),
            )
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// Anything that can go wrong inside a handler after validation
#[derive(Debug, Error)]
pub enum HandlerFailure {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("blocking task failed: {0}")]
    Join(#[from] JoinError),
}

impl HandlerFailure {
    /// Whether the store itself reported the failure
    pub fn is_store_reported(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_store_reported())
    }
}

/// Route a handler failure through an [`ErrorContext`]
pub trait OrNormalize<T> {
    fn or_normalize(self, ctx: &ErrorContext) -> Result<T, ApiError>;
}

impl<T, E: Into<HandlerFailure>> OrNormalize<T> for Result<T, E> {
    fn or_normalize(self, ctx: &ErrorContext) -> Result<T, ApiError> {
        self.map_err(|failure| ctx.normalize(failure))
    }
}

/// What a handler was doing when it failed
#[derive(Debug, Clone)]
pub struct ErrorContext {
    action: &'static str,
    module: &'static str,
    params: Vec<(&'static str, String)>,
}

impl ErrorContext {
    pub fn new(action: &'static str, module: &'static str) -> Self {
        Self {
            action,
            module,
            params: Vec::new(),
        }
    }

    /// Record an operation parameter for the log line
    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    /// Log a failure and reduce it to its generic client message
    pub fn normalize(&self, failure: impl Into<HandlerFailure>) -> ApiError {
        let failure = failure.into();
        if !failure.is_store_reported() {
            return self.unexpected(failure);
        }

        tracing::error!(
            action = self.action,
            module = self.module,
            params = %self.rendered_params(),
            error = %failure,
            "database error"
        );
        ApiError::StoreFailure(format!(
            "Database error when try to {} {}, see logs for more details",
            self.action, self.module
        ))
    }

    /// Log a failure and report it as server-caused, whatever its source
    pub fn unexpected(&self, failure: impl Into<HandlerFailure>) -> ApiError {
        let failure = failure.into();
        tracing::error!(
            action = self.action,
            module = self.module,
            params = %self.rendered_params(),
            error = %failure,
            "request failed"
        );
        ApiError::Internal(format!(
            "Error when try to {} {}, see logs for more details.",
            self.action, self.module
        ))
    }

    fn rendered_params(&self) -> String {
        self.params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
