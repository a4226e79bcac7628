use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    error::{AppError, ErrorBody},
    products::{dto::ProductRequest, repo_types::Product},
    state::AppState,
    validation::ValidJson,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/products", get(list_products))
}

/// Mutations live inside the authenticated perimeter.
pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses((status = 200, body = [Product]))
)]
#[instrument(skip(state))]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.products.list().await?))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    security(("cookie_auth" = [])),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product created and owned by the caller", body = Product),
        (status = 400, description = "Validation error or unparsable JSON", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired session cookie", body = ErrorBody)
    )
)]
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidJson(payload): ValidJson<ProductRequest>,
) -> Result<Json<Product>, AppError> {
    let product = state.products.create(user_id, payload.into()).await?;
    info!(user_id, product_id = product.id, "product created");
    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    security(("cookie_auth" = [])),
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductRequest,
    responses(
        (status = 200, body = Product),
        (status = 400, description = "Validation error or unparsable JSON", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired session cookie", body = ErrorBody),
        (status = 404, description = "No product with this id is owned by the caller", body = ErrorBody)
    )
)]
#[instrument(skip(state, id, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    ValidJson(payload): ValidJson<ProductRequest>,
) -> Result<Json<Product>, AppError> {
    let Path(id) = id.map_err(|_| AppError::Validation("Invalid product ID".into()))?;
    let product = state
        .products
        .update(user_id, id, payload.into())
        .await?
        .ok_or(AppError::NotFound("product"))?;
    info!(user_id, product_id = id, "product updated");
    Ok(Json(product))
}
