use async_trait::async_trait;

use crate::db::PgStore;
use crate::error::StoreError;
use crate::products::repo_types::{Product, ProductDraft};

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, StoreError>;
    async fn find(&self, id: i64) -> Result<Option<Product>, StoreError>;
    async fn create(&self, owner_id: i64, draft: ProductDraft) -> Result<Product, StoreError>;
    /// Only rows owned by `owner_id` match; anything else is `None`.
    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        draft: ProductDraft,
    ) -> Result<Option<Product>, StoreError>;
}

#[async_trait]
impl ProductRepo for PgStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, product_name, brand_name, price, status, quantity, category, user_id
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, product_name, brand_name, price, status, quantity, category, user_id
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, owner_id: i64, draft: ProductDraft) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (product_name, brand_name, price, status, quantity, category, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, product_name, brand_name, price, status, quantity, category, user_id
            "#,
        )
        .bind(&draft.product_name)
        .bind(&draft.brand_name)
        .bind(draft.price)
        .bind(draft.status())
        .bind(draft.quantity)
        .bind(&draft.category)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        draft: ProductDraft,
    ) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
               SET product_name = $3, brand_name = $4, price = $5,
                   status = $6, quantity = $7, category = $8
             WHERE id = $1 AND user_id = $2
            RETURNING id, product_name, brand_name, price, status, quantity, category, user_id
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&draft.product_name)
        .bind(&draft.brand_name)
        .bind(draft.price)
        .bind(draft.status())
        .bind(draft.quantity)
        .bind(&draft.category)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
