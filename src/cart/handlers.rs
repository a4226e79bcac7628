use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{dto::MessageResponse, extractors::AuthUser},
    cart::{
        dto::{AddToCartRequest, UpdateCartItemRequest},
        repo::USER_FKEY,
        repo_types::CartItem,
    },
    error::{AppError, ErrorBody, StoreError},
    state::AppState,
    validation::ValidJson,
};

/// All cart routes require authentication.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart).post(add_to_cart))
        .route("/cart/:id", put(update_cart_item).delete(remove_from_cart))
}

fn cart_item_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    id.map(|Path(id)| id)
        .map_err(|_| AppError::Validation("Invalid cart item ID".into()))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    tag = "Cart",
    security(("cookie_auth" = [])),
    responses((status = 200, body = [CartItem]), (status = 401, description = "Missing, invalid or expired session cookie", body = ErrorBody))
)]
#[instrument(skip(state))]
pub async fn get_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<CartItem>>, AppError> {
    Ok(Json(state.cart.list(user_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    tag = "Cart",
    security(("cookie_auth" = [])),
    request_body = AddToCartRequest,
    responses(
        (status = 200, body = CartItem),
        (status = 400, description = "Validation error or unparsable JSON", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired session cookie", body = ErrorBody),
        (status = 404, description = "No product matches", body = ErrorBody)
    )
)]
#[instrument(skip(state, payload))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidJson(payload): ValidJson<AddToCartRequest>,
) -> Result<Json<CartItem>, AppError> {
    if state.products.find(payload.product_id).await?.is_none() {
        warn!(user_id, product_id = payload.product_id, "add to cart: unknown product");
        return Err(AppError::NotFound("product"));
    }

    let item = state
        .cart
        .add(user_id, payload.product_id, payload.quantity)
        .await
        .map_err(|e| match e {
            StoreError::MissingReference(constraint) if constraint == USER_FKEY => {
                warn!(user_id, "add to cart: token subject no longer exists");
                AppError::NotFound("user")
            }
            // product deleted between the lookup and the insert
            StoreError::MissingReference(_) => AppError::NotFound("product"),
            other => other.into(),
        })?;

    info!(user_id, cart_item_id = item.id, "cart item added");
    Ok(Json(item))
}

#[utoipa::path(
    put,
    path = "/api/cart/{id}",
    tag = "Cart",
    security(("cookie_auth" = [])),
    params(("id" = i64, Path, description = "Cart item id")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, body = CartItem),
        (status = 400, description = "Validation error or unparsable JSON", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired session cookie", body = ErrorBody),
        (status = 404, description = "No cart item of the caller matches", body = ErrorBody)
    )
)]
#[instrument(skip(state, id, payload))]
pub async fn update_cart_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    ValidJson(payload): ValidJson<UpdateCartItemRequest>,
) -> Result<Json<CartItem>, AppError> {
    let id = cart_item_id(id)?;
    let item = state
        .cart
        .update_quantity(user_id, id, payload.quantity)
        .await?
        .ok_or(AppError::NotFound("cart item"))?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{id}",
    tag = "Cart",
    security(("cookie_auth" = [])),
    params(("id" = i64, Path, description = "Cart item id")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Id is not an integer", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired session cookie", body = ErrorBody),
        (status = 404, description = "No cart item of the caller matches", body = ErrorBody)
    )
)]
#[instrument(skip(state, id))]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = cart_item_id(id)?;
    if !state.cart.remove(user_id, id).await? {
        return Err(AppError::NotFound("cart item"));
    }
    info!(user_id, cart_item_id = id, "cart item removed");
    Ok(Json(MessageResponse {
        message: "Item removed from cart",
    }))
}
