//! Session cookie construction.

use axum_extra::extract::cookie::Cookie;

use gatehouse_core::config::SessionConfig;
use gatehouse_core::error::AppError;

/// Build the cookie carrying `sid` for `max_age_seconds`.
pub fn session_cookie(
    config: &SessionConfig,
    sid: &str,
    max_age_seconds: i64,
) -> Result<Cookie<'static>, AppError> {
    build(config, sid, max_age_seconds.max(0))
}

/// Build a cookie that makes the browser drop the session cookie.
pub fn cleared_cookie(config: &SessionConfig) -> Result<Cookie<'static>, AppError> {
    build(config, "", 0)
}

fn build(config: &SessionConfig, value: &str, max_age: i64) -> Result<Cookie<'static>, AppError> {
    let mut raw = format!(
        "{}={value}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age}",
        config.cookie_name
    );
    if config.secure_cookie {
        raw.push_str("; Secure");
    }

    Cookie::parse(raw)
        .map_err(|e| AppError::internal(format!("Failed to build session cookie: {e}")))
}
