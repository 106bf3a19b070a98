//! The seam the authorization middleware resolves identities through.

use async_trait::async_trait;

use gatehouse_auth::{IdentityService, Resolution};
use gatehouse_entity::identity::UserId;

use crate::client::IdentityClient;

/// Resolves session ids and roles for the authorization middleware.
///
/// Consumers bind this to [`IdentityClient`]; the in-process binding to
/// [`IdentityService`] serves tests and co-located routers.
#[async_trait]
pub trait IdentityResolver: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve a sid to the numeric id of its owner.
    async fn resolve_user_id(&self, sid: &str) -> Resolution<UserId>;

    /// Resolve the role of an identity.
    async fn resolve_role(&self, user_id: UserId) -> Resolution<String>;
}

#[async_trait]
impl IdentityResolver for IdentityClient {
    async fn resolve_user_id(&self, sid: &str) -> Resolution<UserId> {
        IdentityClient::resolve_user_id(self, sid).await
    }

    async fn resolve_role(&self, user_id: UserId) -> Resolution<String> {
        IdentityClient::resolve_role(self, user_id).await
    }
}

#[async_trait]
impl IdentityResolver for IdentityService {
    async fn resolve_user_id(&self, sid: &str) -> Resolution<UserId> {
        IdentityService::resolve_user_id(self, sid).await
    }

    async fn resolve_role(&self, user_id: UserId) -> Resolution<String> {
        IdentityService::resolve_role(self, user_id).await
    }
}
