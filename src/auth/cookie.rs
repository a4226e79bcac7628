//! The `jwt` session cookie: HTTP-only, secure, sendable cross-site.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

pub const SESSION_COOKIE: &str = "jwt";

/// Cookie carrying a freshly issued token for `ttl`.
/// `Expires` is left out when it would fall past the representable calendar;
/// `Max-Age` still bounds the cookie.
pub fn session_cookie(token: String, ttl: Duration) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(ttl)
        .build();
    if let Some(expires) = OffsetDateTime::now_utc().checked_add(ttl) {
        cookie.set_expires(expires);
    }
    cookie
}

/// Empty cookie dated in the past, so the browser drops the session.
pub fn cleared_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .expires(OffsetDateTime::now_utc() - Duration::hours(1))
        .build()
}

/// Token from the session cookie, if present and non-empty.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
