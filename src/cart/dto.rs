use serde::Deserialize;
use utoipa::ToSchema;

use crate::validation::{self, Validate};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub quantity: i64,
}

impl Validate for AddToCartRequest {
    fn validate(&self) -> Result<(), String> {
        validation::at_least("productId", self.product_id, 1)?;
        validation::at_least("quantity", self.quantity, 1)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    #[serde(default)]
    pub quantity: i64,
}

impl Validate for UpdateCartItemRequest {
    fn validate(&self) -> Result<(), String> {
        validation::at_least("quantity", self.quantity, 1)
    }
}
