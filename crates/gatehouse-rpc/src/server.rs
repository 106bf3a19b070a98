//! Identity RPC server: the internal listener's router and handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{debug, warn};

use gatehouse_auth::{IdentityService, Resolution};
use gatehouse_core::config::RpcConfig;
use gatehouse_core::deadline::with_deadline;
use gatehouse_entity::session::sid_prefix;

use crate::wire::{
    RESOLVE_ROLE_PATH, RESOLVE_SESSION_PATH, ResolveRoleRequest, ResolveRoleResponse,
    ResolveSessionRequest, ResolveSessionResponse, RoleBody, UserIdBody,
};

/// State shared by the RPC handlers.
#[derive(Debug, Clone)]
pub struct RpcState {
    /// Identity resolution backend.
    pub identity: Arc<IdentityService>,
    /// Deadline applied to each resolution.
    pub deadline: Duration,
}

impl RpcState {
    /// Creates RPC state from configuration.
    pub fn new(identity: Arc<IdentityService>, config: &RpcConfig) -> Self {
        Self {
            identity,
            deadline: config.deadline(),
        }
    }
}

/// Build the identity RPC router.
pub fn build_rpc_router(state: RpcState) -> Router {
    Router::new()
        .route(RESOLVE_SESSION_PATH, post(resolve_session))
        .route(RESOLVE_ROLE_PATH, post(resolve_role))
        .with_state(state)
}

/// POST /rpc/v1/resolve-session
pub async fn resolve_session(
    State(state): State<RpcState>,
    Json(req): Json<ResolveSessionRequest>,
) -> Json<ResolveSessionResponse> {
    let resolution = with_deadline(state.deadline, "resolve_session", async {
        Ok(state.identity.resolve_user_id(&req.sid).await)
    })
    .await
    .unwrap_or_else(|e| {
        warn!(sid = %sid_prefix(&req.sid), error = %e, "Session resolution abandoned");
        Resolution::Transient
    });

    debug!(
        sid = %sid_prefix(&req.sid),
        outcome = resolution.label(),
        "resolve_session"
    );
    Json(resolution.map(|user_id| UserIdBody { user_id }))
}

/// POST /rpc/v1/resolve-role
pub async fn resolve_role(
    State(state): State<RpcState>,
    Json(req): Json<ResolveRoleRequest>,
) -> Json<ResolveRoleResponse> {
    let resolution = with_deadline(state.deadline, "resolve_role", async {
        Ok(state.identity.resolve_role(req.user_id).await)
    })
    .await
    .unwrap_or_else(|e| {
        warn!(user_id = req.user_id, error = %e, "Role resolution abandoned");
        Resolution::Transient
    });

    debug!(user_id = req.user_id, outcome = resolution.label(), "resolve_role");
    Json(resolution.map(|role| RoleBody { role }))
}
