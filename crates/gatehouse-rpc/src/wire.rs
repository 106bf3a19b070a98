//! Wire format of the identity RPC.
//!
//! JSON over HTTP. Every answer is a `200` whose body carries a `status`
//! tag of `resolved`, `not_found` or `transient`.

use serde::{Deserialize, Serialize};

use gatehouse_auth::Resolution;
use gatehouse_entity::identity::UserId;

/// Route of `ResolveSessionToUserID`.
pub const RESOLVE_SESSION_PATH: &str = "/rpc/v1/resolve-session";

/// Route of `ResolveRole`.
pub const RESOLVE_ROLE_PATH: &str = "/rpc/v1/resolve-role";

/// Body of a session resolution request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveSessionRequest {
    /// Session identifier taken from the caller's cookie.
    pub sid: String,
}

/// Body of a role resolution request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRoleRequest {
    /// Numeric identity id.
    pub user_id: UserId,
}

/// Resolved payload of a session resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdBody {
    /// Numeric id of the session owner.
    pub user_id: UserId,
}

/// Resolved payload of a role resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBody {
    /// Role of the identity.
    pub role: String,
}

/// Response of `POST /rpc/v1/resolve-session`.
pub type ResolveSessionResponse = Resolution<UserIdBody>;

/// Response of `POST /rpc/v1/resolve-role`.
pub type ResolveRoleResponse = Resolution<RoleBody>;
