use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// One product line in a user's cart.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub product_id: i64,
    pub user_id: i64,
    pub quantity: i64,
}
