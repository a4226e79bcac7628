use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::jwt::AuthError;
use crate::error::AppError;

/// Identity resolved by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // only present when the route sits behind `require_auth`
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AppError::Auth(AuthError::Missing))
    }
}
