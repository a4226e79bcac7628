use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::repo_types::User;
use crate::validation::{self, Validate};

/// Request body for user registration.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), String> {
        validation::email("email", &self.email)?;
        validation::required("username", &self.username)?;
        validation::required("phoneNumber", &self.phone_number)?;
        validation::min_len("password", &self.password, 6)
    }
}

/// Request body for login.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        validation::email("email", &self.email)?;
        validation::required("password", &self.password)
    }
}

/// Request body for `PUT /user`; every field is replaced.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "phone_number")]
    pub phone_number: String,
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<(), String> {
        validation::required("username", &self.username)?;
        validation::email("email", &self.email)?;
        validation::required("phoneNumber", &self.phone_number)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

impl Validate for UpdatePasswordRequest {
    fn validate(&self) -> Result<(), String> {
        validation::required("old_password", &self.old_password)?;
        validation::min_len("new_password", &self.new_password, 8)
    }
}

/// Response returned after login. The token is also set as the `jwt` cookie.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(value_type = String)]
    pub message: &'static str,
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone_number: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone_number: user.phone_number,
        }
    }
}

/// Static `{ "message": ... }` body.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(value_type = String)]
    pub message: &'static str,
}
