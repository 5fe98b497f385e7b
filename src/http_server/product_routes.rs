//! Product HTTP Routes
//!
//! Every product endpoint requires a bearer token.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::{require_auth, Identity};
use crate::model::{ProductFields, ProductPatch, ProductView};
use crate::repository::{PageEnvelope, PageRequest};
use crate::validation::schemas::{CREATE_PRODUCT, NOTIFY_CLIENT, PRODUCT_CHANGES, REPLACE_PRODUCT};
use crate::validation::RuleSet;

use super::error::{ApiError, ErrorContext, OrNormalize};
use super::extract::{PageQuery, ValidId, ValidJson, Validated};
use super::state::AppState;

/// Product routes with shared state
pub fn product_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_products_handler))
        .route("/byUser", get(products_by_user_handler))
        .route("/create", post(create_product_handler))
        .route(
            "/:id",
            get(get_product_handler)
                .put(replace_product_handler)
                .patch(patch_product_handler),
        )
        .route("/:id/notify-client", post(notify_client_handler))
        .route("/:id/remove-product", delete(remove_product_handler))
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            require_auth,
        ))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

/// Full product body, as sent on create and on replace
#[derive(Debug, Clone, Deserialize)]
pub struct ProductBody {
    pub name: String,
    pub year: i64,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl Validated for ProductBody {
    const RULES: RuleSet = CREATE_PRODUCT;
}

impl From<ProductBody> for ProductFields {
    fn from(body: ProductBody) -> Self {
        Self {
            name: body.name.trim().to_string(),
            year: body.year,
            price: body.price.unwrap_or_default(),
            description: body.description,
            user: body.user_id,
        }
    }
}

/// Body of a full replacement
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ReplaceProductRequest(pub ProductBody);

impl Validated for ReplaceProductRequest {
    const RULES: RuleSet = REPLACE_PRODUCT;
}

impl Validated for ProductPatch {
    const RULES: RuleSet = PRODUCT_CHANGES;
}

#[derive(Debug, Deserialize)]
pub struct NotifyClientRequest {
    #[serde(rename = "clientEmail")]
    pub client_email: String,
    pub data: ProductPatch,
}

impl Validated for NotifyClientRequest {
    const RULES: RuleSet = NOTIFY_CLIENT;
}

#[derive(Debug, Serialize)]
pub struct NotifyClientResponse {
    pub data: ProductView,
    pub message: String,
}

// ==================
// Handlers
// ==================

async fn list_products_handler(
    State(state): State<AppState>,
    PageQuery(page): PageQuery,
) -> Result<Response, ApiError> {
    let Some(page) = page else {
        let ctx = ErrorContext::new("get all", "products");
        let listing = state.products.find_all(None, None).await.or_normalize(&ctx)?;
        let views: Vec<ProductView> = listing.items.into_iter().map(ProductView::from).collect();
        return Ok(Json(views).into_response());
    };

    let ctx = ErrorContext::new("get all", "products (paginated)").param("page", page);
    let request = PageRequest::new(page, state.page_size);
    let listing = state
        .products
        .find_all(None, Some(request))
        .await
        .or_normalize(&ctx)?;

    Ok(Json(PageEnvelope::new(request, listing.map(ProductView::from))).into_response())
}

async fn products_by_user_handler(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<ProductView>>, ApiError> {
    let ctx = ErrorContext::new("get", "products by user").param("user_id", &identity.user_id);
    let listing = state
        .products
        .find_all(Some(&identity.user_id), None)
        .await
        .or_normalize(&ctx)?;

    Ok(Json(listing.items.into_iter().map(ProductView::from).collect()))
}

async fn get_product_handler(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Json<ProductView>, ApiError> {
    let ctx = ErrorContext::new("get", "product by id").param("id", &id);

    state
        .products
        .find_by_id_with_owner(&id)
        .await
        .or_normalize(&ctx)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn create_product_handler(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<ProductBody>,
) -> Result<(StatusCode, Json<ProductView>), ApiError> {
    let ctx = ErrorContext::new("register", "a product").param("user_id", &body.user_id);
    let product = state
        .products
        .create(body.into())
        .await
        .or_normalize(&ctx)?;

    tracing::info!(product_id = %product.id, owner = %product.user, "product registered");
    Ok((StatusCode::CREATED, Json(ProductView::from(product))))
}

/// Overwrite every mutable field; omitted optional fields are cleared
async fn replace_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(ReplaceProductRequest(body)): ValidJson<ReplaceProductRequest>,
) -> Result<Json<ProductView>, ApiError> {
    let ctx = ErrorContext::new("update", "the product").param("id", &id);

    state
        .products
        .update_by_id(&id, body.into())
        .await
        .or_normalize(&ctx)?
        .map(|product| Json(ProductView::from(product)))
        .ok_or(ApiError::NotFound)
}

async fn patch_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(patch): ValidJson<ProductPatch>,
) -> Result<Json<ProductView>, ApiError> {
    let ctx = ErrorContext::new("update partially", "the product").param("id", &id);
    let product = apply_patch(&state, &id, patch, &ctx).await?;

    Ok(Json(product))
}

async fn notify_client_handler(
    State(state): State<AppState>,
    ValidId(id): ValidId,
    ValidJson(request): ValidJson<NotifyClientRequest>,
) -> Result<Json<NotifyClientResponse>, ApiError> {
    let ctx = ErrorContext::new("update partially", "the product and notify the client")
        .param("id", &id)
        .param("client_email", &request.client_email);
    let product = apply_patch(&state, &id, request.data, &ctx).await?;

    Ok(Json(NotifyClientResponse {
        data: product,
        message: format!("Email sent successfully to {}", request.client_email),
    }))
}

async fn remove_product_handler(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    let ctx = ErrorContext::new("delete", "the product").param("id", &id);

    if state.products.delete_by_id(&id).await.or_normalize(&ctx)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// Merge a patch over the stored product and write the result back
async fn apply_patch(
    state: &AppState,
    id: &str,
    mut patch: ProductPatch,
    ctx: &ErrorContext,
) -> Result<ProductView, ApiError> {
    let current = state
        .products
        .find_by_id(id)
        .await
        .or_normalize(ctx)?
        .ok_or(ApiError::NotFound)?;

    patch.name = patch.name.map(|name| name.trim().to_string());
    let merged = patch.merge_onto(&current);

    state
        .products
        .update_by_id(id, merged)
        .await
        .or_normalize(ctx)?
        .map(ProductView::from)
        .ok_or(ApiError::NotFound)
}
