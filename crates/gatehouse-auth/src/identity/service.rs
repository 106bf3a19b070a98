//! Read-only identity resolution backing the internal RPC surface.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use gatehouse_core::deadline::with_deadline;
use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_entity::identity::UserId;
use gatehouse_entity::session::sid_prefix;

use crate::session::SessionManager;
use crate::store::IdentityStore;

use super::resolution::{Resolution, is_absence};

/// Resolves session ids to user ids and user ids to roles.
///
/// Callers only ever supply a sid or a numeric id; login and role values
/// always come from the stores.
#[derive(Debug, Clone)]
pub struct IdentityService {
    sessions: Arc<SessionManager>,
    identities: Arc<dyn IdentityStore>,
    op_timeout: Duration,
}

impl IdentityService {
    /// Creates an identity service over the session manager and identity store.
    pub fn new(
        sessions: Arc<SessionManager>,
        identities: Arc<dyn IdentityStore>,
        op_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            identities,
            op_timeout,
        }
    }

    /// Resolve a sid to the numeric id of its owner.
    ///
    /// Fails whenever [`SessionManager::validate_session`] would.
    pub async fn get_user_id(&self, sid: &str) -> AppResult<UserId> {
        let login = self.sessions.validate_session(sid).await?;
        let identity = with_deadline(
            self.op_timeout,
            "identity lookup",
            self.identities.find_by_login(&login),
        )
        .await?
        .ok_or_else(|| AppError::not_found("Identity for session not found"))?;
        Ok(identity.id)
    }

    /// Look up the role of an identity by numeric id.
    pub async fn get_role(&self, user_id: UserId) -> AppResult<String> {
        let identity = with_deadline(
            self.op_timeout,
            "identity lookup",
            self.identities.find_by_id(user_id),
        )
        .await?
        .ok_or_else(|| AppError::not_found("Identity not found"))?;
        Ok(identity.role)
    }

    /// [`get_user_id`](Self::get_user_id), classified for the wire.
    pub async fn resolve_user_id(&self, sid: &str) -> Resolution<UserId> {
        let result = self.get_user_id(sid).await;
        if let Err(e) = &result {
            log_failure("resolve_session", sid_prefix(sid), e);
        }
        Resolution::from_result(result)
    }

    /// [`get_role`](Self::get_role), classified for the wire.
    pub async fn resolve_role(&self, user_id: UserId) -> Resolution<String> {
        let result = self.get_role(user_id).await;
        if let Err(e) = &result {
            log_failure("resolve_role", &user_id.to_string(), e);
        }
        Resolution::from_result(result)
    }
}

fn log_failure(operation: &str, subject: &str, err: &AppError) {
    if is_absence(err.kind) {
        debug!(operation, subject, error = %err, "Identity not resolved");
    } else {
        warn!(operation, subject, error = %err, "Identity resolution failed");
    }
}
