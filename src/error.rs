use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::auth::{jwt::AuthError, password::HashingError};

/// Failures reported by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value violates {0}")]
    Duplicate(String),
    #[error("referenced row does not exist ({0})")]
    MissingReference(String),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db) = err.as_database_error() {
            let constraint = db.constraint().unwrap_or("constraint").to_string();
            if db.is_unique_violation() {
                return StoreError::Duplicate(constraint);
            }
            if db.is_foreign_key_violation() {
                return StoreError::MissingReference(constraint);
            }
        }
        StoreError::Database(err)
    }
}

/// Request-level error; every handler returns `Result<_, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("cannot parse JSON: {0}")]
    InvalidJson(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("incorrect password")]
    WrongPassword,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Hashing(#[from] HashingError),
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Body shape shared by every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    pub error: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) | AppError::WrongPassword => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Hashing(_) | AppError::Signing(_) | AppError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        let (message, error) = match self {
            AppError::Validation(detail) => ("Validation error".to_string(), detail.clone()),
            AppError::InvalidJson(detail) => ("Cannot parse JSON".to_string(), detail.clone()),
            AppError::Auth(e) => ("unauthenticated".to_string(), e.to_string()),
            AppError::WrongPassword => (
                "Incorrect password".to_string(),
                "password does not match".to_string(),
            ),
            AppError::NotFound(what) => (
                format!("{what} not found"),
                format!("no {what} matches the request"),
            ),
            AppError::Conflict(detail) => ("Conflict".to_string(), detail.clone()),
            AppError::Hashing(_) | AppError::Signing(_) | AppError::Store(_) => (
                "Internal server error".to_string(),
                "internal error".to_string(),
            ),
        };
        ErrorBody { message, error }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}
