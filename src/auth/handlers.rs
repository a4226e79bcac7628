use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        cookie::{cleared_session_cookie, session_cookie},
        dto::{
            LoginRequest, LoginResponse, MessageResponse, PublicUser, RegisterRequest,
            UpdatePasswordRequest, UpdateProfileRequest,
        },
        extractors::AuthUser,
        repo_types::{NewUser, ProfileUpdate, User},
    },
    error::{AppError, ErrorBody, StoreError},
    state::AppState,
    validation::{normalize_email, ValidJson},
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes that must be wrapped by `require_auth`.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(get_user).put(update_user))
        .route("/user/password", put(update_password))
        .route("/logout", post(logout))
}

fn email_taken(err: StoreError) -> AppError {
    match err {
        StoreError::Duplicate(_) => AppError::Conflict("Email already registered".into()),
        other => other.into(),
    }
}

#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created", body = User),
        (status = 400, description = "Validation error or unparsable JSON", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<Json<User>, AppError> {
    let email = normalize_email(&payload.email);

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = state.hasher.hash(&payload.password)?;

    let user = state
        .users
        .create(NewUser {
            email,
            username: payload.username.trim().to_string(),
            phone_number: payload.phone_number.trim().to_string(),
            password_hash,
        })
        .await
        .map_err(email_taken)?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie `jwt` set", body = LoginResponse),
        (status = 400, description = "Validation error or unparsable JSON", body = ErrorBody),
        (status = 401, description = "Incorrect password", body = ErrorBody),
        (status = 404, description = "No user matches", body = ErrorBody)
    )
)]
#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let email = normalize_email(&payload.email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::NotFound("user"));
    };

    if !state.hasher.verify(&user.password_hash, &payload.password)? {
        warn!(email = %email, user_id = user.id, "login invalid password");
        return Err(AppError::WrongPassword);
    }

    let token = state.keys.issue(user.id)?;
    let jar = jar.add(session_cookie(token.clone(), state.keys.ttl()));

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful",
            token,
            user: PublicUser::from(user),
        }),
    ))
}

/// Clears the cookie only; the token itself stays valid until it expires.
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "Auth",
    security(("cookie_auth" = [])),
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse),
        (status = 401, description = "Missing, invalid or expired session cookie", body = ErrorBody)
    )
)]
#[instrument(skip(jar))]
pub async fn logout(
    AuthUser(user_id): AuthUser,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    info!(user_id, "user logged out");
    (
        jar.add(cleared_session_cookie()),
        Json(MessageResponse {
            message: "logout success",
        }),
    )
}

#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Auth",
    security(("cookie_auth" = [])),
    responses(
        (status = 200, body = User),
        (status = 401, description = "Missing, invalid or expired session cookie", body = ErrorBody),
        (status = 404, description = "No user matches", body = ErrorBody)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, AppError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/user",
    tag = "Auth",
    security(("cookie_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, body = User),
        (status = 400, description = "Validation error or unparsable JSON", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired session cookie", body = ErrorBody),
        (status = 404, description = "No user matches", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidJson(payload): ValidJson<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let profile = ProfileUpdate {
        email: normalize_email(&payload.email),
        username: payload.username.trim().to_string(),
        phone_number: payload.phone_number.trim().to_string(),
    };

    let user = state
        .users
        .update_profile(user_id, profile)
        .await
        .map_err(email_taken)?
        .ok_or(AppError::NotFound("user"))?;

    info!(user_id, "profile updated");
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/user/password",
    tag = "Auth",
    security(("cookie_auth" = [])),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Validation error or unparsable JSON", body = ErrorBody),
        (status = 401, description = "Unauthenticated or incorrect old password", body = ErrorBody),
        (status = 404, description = "No user matches", body = ErrorBody)
    )
)]
#[instrument(skip(state, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidJson(payload): ValidJson<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    if !state.hasher.verify(&user.password_hash, &payload.old_password)? {
        warn!(user_id, "password change with wrong old password");
        return Err(AppError::WrongPassword);
    }

    let password_hash = state.hasher.hash(&payload.new_password)?;
    if !state.users.set_password_hash(user_id, &password_hash).await? {
        return Err(AppError::NotFound("user"));
    }

    info!(user_id, "password updated");
    Ok(Json(MessageResponse {
        message: "password updated successfully",
    }))
}
