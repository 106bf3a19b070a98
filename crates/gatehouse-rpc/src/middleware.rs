//! Consumer-side authorization middleware.
//!
//! Reads the session cookie, resolves it through an [`IdentityResolver`] and
//! injects an [`AuthenticatedIdentity`] into the request extensions. It never
//! touches a store directly.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use tracing::debug;

use gatehouse_entity::identity::UserId;
use gatehouse_entity::session::sid_prefix;

use crate::resolver::IdentityResolver;

/// Middleware state: how to find the cookie and who to ask about it.
#[derive(Debug, Clone)]
pub struct AuthGate {
    resolver: Arc<dyn IdentityResolver>,
    cookie_name: String,
    fetch_role: bool,
}

impl AuthGate {
    /// Creates a gate that resolves the user id only.
    pub fn new(resolver: Arc<dyn IdentityResolver>, cookie_name: impl Into<String>) -> Self {
        Self {
            resolver,
            cookie_name: cookie_name.into(),
            fetch_role: false,
        }
    }

    /// Also resolve the role of every authenticated caller.
    pub fn with_role(mut self) -> Self {
        self.fetch_role = true;
        self
    }
}

/// The resolved caller, available to downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    /// Numeric identity id.
    pub user_id: UserId,
    /// Role, when the gate was built `with_role`.
    pub role: Option<String>,
}

impl<S> FromRequestParts<S> for AuthenticatedIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// Rejects the request with 401 unless the session cookie resolves.
pub async fn require_identity(
    State(gate): State<AuthGate>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let sid = match jar.get(&gate.cookie_name).map(|c| c.value()) {
        Some(sid) if !sid.is_empty() => sid.to_string(),
        _ => return StatusCode::UNAUTHORIZED.into_response(),
    };

    let Some(user_id) = gate.resolver.resolve_user_id(&sid).await.resolved() else {
        debug!(sid = %sid_prefix(&sid), "Session did not resolve, rejecting");
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let role = if gate.fetch_role {
        match gate.resolver.resolve_role(user_id).await.resolved() {
            Some(role) => Some(role),
            None => {
                debug!(user_id, "Role did not resolve, rejecting");
                return StatusCode::UNAUTHORIZED.into_response();
            }
        }
    } else {
        None
    };

    request
        .extensions_mut()
        .insert(AuthenticatedIdentity { user_id, role });
    next.run(request).await
}

/// Returns 403 unless the caller holds `role`.
pub fn require_role(identity: &AuthenticatedIdentity, role: &str) -> Result<(), Response> {
    match identity.role.as_deref() {
        Some(held) if held == role => Ok(()),
        _ => Err(StatusCode::FORBIDDEN.into_response()),
    }
}
