//! Session handlers: login, logout, signup, authcheck.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use tracing::{info, warn};

use gatehouse_core::error::AppError;
use gatehouse_entity::Session;
use gatehouse_entity::session::sid_prefix;

use crate::cookie::{cleared_cookie, session_cookie};
use crate::dto::request::{LoginRequest, SignupRequest};
use crate::dto::response::{ApiResponse, AuthCheckResponse, MessageResponse, SessionResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

type SessionReply = (CookieJar, Json<ApiResponse<SessionResponse>>);

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<SessionReply, ApiError> {
    let identity = state.accounts.authenticate(&req.login, &req.password).await?;
    let session = state.sessions.create_session(&identity.login).await?;

    info!(login = %identity.login, sid = %sid_prefix(&session.sid), "Login succeeded");
    issue(&state, jar, &session)
}

/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<SessionReply, ApiError> {
    let identity = state.accounts.register(&req.login, &req.password, None).await?;
    let session = state.sessions.create_session(&identity.login).await?;

    issue(&state, jar, &session)
}

/// POST /logout
///
/// The cookie is cleared even when the store deletion fails.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<MessageResponse>>), (CookieJar, ApiError)> {
    let sid = session_id(&jar, &state);

    let cleared = match cleared_cookie(&state.config.session) {
        Ok(cookie) => cookie,
        Err(e) => return Err((jar, e.into())),
    };
    let jar = jar.add(cleared);

    if let Some(sid) = sid {
        if let Err(e) = state.sessions.destroy_session(&sid).await {
            warn!(sid = %sid_prefix(&sid), error = %e, "Logout could not destroy session");
            return Err((jar, e.into()));
        }
        info!(sid = %sid_prefix(&sid), "Logged out");
    }

    Ok((
        jar,
        Json(ApiResponse::ok(MessageResponse {
            message: "Logged out successfully".to_string(),
        })),
    ))
}

/// GET /authcheck
pub async fn authcheck(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<ApiResponse<AuthCheckResponse>>, ApiError> {
    let sid = session_id(&jar, &state).ok_or_else(AppError::session_not_found)?;
    let login = state.sessions.validate_session(&sid).await?;

    Ok(Json(ApiResponse::ok(AuthCheckResponse { login })))
}

fn session_id(jar: &CookieJar, state: &AppState) -> Option<String> {
    jar.get(&state.config.session.cookie_name)
        .map(|c| c.value().to_string())
        .filter(|sid| !sid.is_empty())
}

fn issue(state: &AppState, jar: CookieJar, session: &Session) -> Result<SessionReply, ApiError> {
    let remaining = session.remaining_at(state.sessions.now());
    let max_age = (remaining.num_milliseconds() + 999).div_euclid(1000);
    let cookie = session_cookie(&state.config.session, &session.sid, max_age)?;

    Ok((
        jar.add(cookie),
        Json(ApiResponse::ok(SessionResponse::from(session))),
    ))
}
