use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::{cookie::session_token, extractors::AuthUser, jwt::AuthError};
use crate::{error::AppError, state::AppState};

/// Guards the protected router: verifies the `jwt` cookie and stores the
/// subject as `AuthUser` in the request extensions. No database lookup happens here.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = session_token(&jar) else {
        warn!(path = %req.uri().path(), "missing session cookie");
        return Err(AuthError::Missing.into());
    };

    let user_id = state.keys.verify(&token).map_err(|e| {
        warn!(reason = ?e, path = %req.uri().path(), "rejected session token");
        AppError::Auth(e)
    })?;

    req.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(req).await)
}
