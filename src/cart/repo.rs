use async_trait::async_trait;

use crate::cart::repo_types::CartItem;
use crate::db::PgStore;
use crate::error::StoreError;

/// Foreign key from `cart_items.user_id` to `users.id`, as named by Postgres.
pub const USER_FKEY: &str = "cart_items_user_id_fkey";

/// Every lookup is scoped by `user_id`: rows of other users are invisible.
#[async_trait]
pub trait CartRepo: Send + Sync {
    async fn list(&self, user_id: i64) -> Result<Vec<CartItem>, StoreError>;
    async fn add(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<CartItem, StoreError>;
    async fn update_quantity(
        &self,
        user_id: i64,
        id: i64,
        quantity: i64,
    ) -> Result<Option<CartItem>, StoreError>;
    /// `false` when nothing owned by `user_id` had this id.
    async fn remove(&self, user_id: i64, id: i64) -> Result<bool, StoreError>;
}

#[async_trait]
impl CartRepo for PgStore {
    async fn list(&self, user_id: i64) -> Result<Vec<CartItem>, StoreError> {
        let rows = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, product_id, user_id, quantity
            FROM cart_items
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn add(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<CartItem, StoreError> {
        let row = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (product_id, user_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, user_id, quantity
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_quantity(
        &self,
        user_id: i64,
        id: i64,
        quantity: i64,
    ) -> Result<Option<CartItem>, StoreError> {
        let row = sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart_items
               SET quantity = $3
             WHERE id = $1 AND user_id = $2
            RETURNING id, product_id, user_id, quantity
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn remove(&self, user_id: i64, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
