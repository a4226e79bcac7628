use serde::Deserialize;
use utoipa::ToSchema;

use crate::products::repo_types::ProductDraft;
use crate::validation::{self, Validate};

/// Body for `POST /products` and `PUT /products/:id`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default, alias = "Category")]
    pub category: String,
}

impl Validate for ProductRequest {
    fn validate(&self) -> Result<(), String> {
        validation::len_between("productName", &self.product_name, 2, 100)?;
        validation::len_between("brandName", &self.brand_name, 2, 100)?;
        validation::at_least("price", self.price, 1)?;
        validation::at_least("quantity", self.quantity, 0)?;
        validation::required("category", &self.category)
    }
}

impl From<ProductRequest> for ProductDraft {
    fn from(req: ProductRequest) -> Self {
        Self {
            product_name: req.product_name.trim().to_string(),
            brand_name: req.brand_name.trim().to_string(),
            price: req.price,
            quantity: req.quantity,
            category: req.category.trim().to_string(),
        }
    }
}
