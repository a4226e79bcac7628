use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Payload schema check. Returns the first rule that fails.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// `Json<T>` that also runs `T::validate`; both failures become 400s.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidJson(rejection.body_text()))?;
        value.validate().map_err(AppError::Validation)?;
        Ok(ValidJson(value))
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

pub fn email(field: &str, value: &str) -> Result<(), String> {
    required(field, value)?;
    if !is_valid_email(value.trim()) {
        return Err(format!("{field} must be a valid email address"));
    }
    Ok(())
}

pub fn min_len(field: &str, value: &str, min: usize) -> Result<(), String> {
    required(field, value)?;
    if value.chars().count() < min {
        return Err(format!("{field} must be at least {min} characters long"));
    }
    Ok(())
}

/// Measures the trimmed value, which is what gets stored.
pub fn len_between(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let value = value.trim();
    min_len(field, value, min)?;
    if value.chars().count() > max {
        return Err(format!("{field} must be at most {max} characters long"));
    }
    Ok(())
}

pub fn at_least(field: &str, value: i64, min: i64) -> Result<(), String> {
    if value < min {
        return Err(format!("{field} must be at least {min}"));
    }
    Ok(())
}

/// Normalised form used for storing and looking up emails.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
