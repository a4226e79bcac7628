use async_trait::async_trait;

use crate::auth::repo_types::{NewUser, ProfileUpdate, User};
use crate::db::PgStore;
use crate::error::StoreError;

/// Credential store.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// `None` when no user has this id.
    async fn update_profile(
        &self,
        id: i64,
        profile: ProfileUpdate,
    ) -> Result<Option<User>, StoreError>;
    /// Replaces the stored hash wholesale; `false` when no user has this id.
    async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<bool, StoreError>;
}

#[async_trait]
impl UserRepo for PgStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, phone_number, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, username, phone_number, password_hash, created_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, phone_number, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, phone_number, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_profile(
        &self,
        id: i64,
        profile: ProfileUpdate,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET email = $2, username = $3, phone_number = $4
             WHERE id = $1
            RETURNING id, email, username, phone_number, password_hash, created_at
            "#,
        )
        .bind(id)
        .bind(&profile.email)
        .bind(&profile.username)
        .bind(&profile.phone_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
