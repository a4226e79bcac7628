use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub product_name: String,
    pub brand_name: String,
    pub price: i64,
    pub status: bool, // in stock, i.e. quantity > 0
    pub quantity: i64,
    pub category: String,
    pub user_id: Option<i64>, // owner; None for rows created before ownership was recorded
}

/// Column values for an insert or a full-row update.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub product_name: String,
    pub brand_name: String,
    pub price: i64,
    pub quantity: i64,
    pub category: String,
}

impl ProductDraft {
    pub fn status(&self) -> bool {
        self.quantity > 0
    }
}
