//! User HTTP Routes
//!
//! Listing, registration, lookup and removal of users (all protected), plus
//! the public login endpoint that issues access tokens.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::auth::crypto::{hash_password_blocking, verify_password_blocking};
use crate::auth::{require_auth, AuthError, IssuedToken};
use crate::model::{NewUser, UserView};
use crate::validation::schemas::{CREATE_USER, LOGIN};
use crate::validation::RuleSet;

use super::error::{ApiError, ErrorContext, OrNormalize};
use super::extract::{ValidId, ValidJson, Validated};
use super::state::AppState;

/// User routes with shared state
pub fn user_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(list_users_handler))
        .route("/create", post(create_user_handler))
        .route("/:id", get(get_user_handler))
        .route("/:id/remove-user", delete(remove_user_handler))
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            require_auth,
        ));

    Router::new()
        .route("/login", post(login_handler))
        .merge(protected)
        .with_state(state)
}

// ==================
// Request Types
// ==================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub password: String,
}

impl Validated for CreateUserRequest {
    const RULES: RuleSet = CREATE_USER;
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validated for LoginRequest {
    const RULES: RuleSet = LOGIN;
}

// ==================
// Handlers
// ==================

async fn list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserView>>, ApiError> {
    let ctx = ErrorContext::new("get all", "users");
    let users = state.users.find_all().await.or_normalize(&ctx)?;

    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

async fn create_user_handler(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let email = request.email.trim().to_string();
    let ctx = ErrorContext::new("register", "the user").param("email", &email);

    let password = hash_password_blocking(request.password)
        .await
        .or_normalize(&ctx)?
        .or_normalize(&ctx)?;

    let user = state
        .users
        .create(NewUser {
            email,
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            avatar: request.avatar,
            password,
        })
        .await
        .or_normalize(&ctx)?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

async fn get_user_handler(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Json<UserView>, ApiError> {
    let ctx = ErrorContext::new("get", "user by id").param("id", &id);

    state
        .users
        .find_by_id(&id)
        .await
        .or_normalize(&ctx)?
        .map(|user| Json(UserView::from(user)))
        .ok_or(ApiError::NotFound)
}

/// Delete a user, then every product it owns.
///
/// The two deletes are separate store calls. If the second one fails the
/// user is gone while its products remain until removed by hand.
async fn remove_user_handler(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    let ctx = ErrorContext::new("delete", "the user").param("id", &id);

    if !state.users.delete_by_id(&id).await.or_normalize(&ctx)? {
        return Err(ApiError::NotFound);
    }

    match state.products.delete_by_owner(&id).await {
        Ok(removed) => {
            tracing::info!(user_id = %id, products = removed, "user removed");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            tracing::warn!(
                user_id = %id,
                "user removed but its products were not; they stay orphaned"
            );
            Err(ErrorContext::new("delete", "the products of the user")
                .param("id", &id)
                .unexpected(err))
        }
    }
}

async fn login_handler(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<IssuedToken>, ApiError> {
    let email = request.email.trim().to_string();
    let ctx = ErrorContext::new("log in", "the user").param("email", &email);

    let Some(user) = state.users.find_by_email(&email).await.or_normalize(&ctx)? else {
        return Err(ApiError::NotFound);
    };

    match verify_password_blocking(request.password, user.password.clone())
        .await
        .or_normalize(&ctx)?
    {
        Ok(true) => {}
        Ok(false) | Err(AuthError::InvalidCredentials) => {
            tracing::warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(ApiError::InvalidCredentials);
        }
        Err(err) => return Err(ctx.normalize(err)),
    }

    let issued = state.jwt.issue(&user).or_normalize(&ctx)?;
    tracing::info!(user_id = %user.id, "access token issued");
    Ok(Json(issued))
}
