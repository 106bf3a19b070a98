//! HTTP client for the identity RPC, used by consuming services.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use gatehouse_auth::Resolution;
use gatehouse_core::config::RpcConfig;
use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_entity::identity::UserId;

use crate::wire::{
    RESOLVE_ROLE_PATH, RESOLVE_SESSION_PATH, ResolveRoleRequest, ResolveSessionRequest, RoleBody,
    UserIdBody,
};

/// Client for the identity RPC.
///
/// Network failures, non-success statuses and undecodable bodies all come
/// back as [`Resolution::Transient`], so callers fail closed.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
}

impl IdentityClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// `timeout` bounds each call end to end.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build identity RPC client",
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from RPC configuration.
    pub fn from_config(config: &RpcConfig) -> AppResult<Self> {
        Self::new(&config.client_url, config.deadline())
    }

    /// `ResolveSessionToUserID`.
    pub async fn resolve_user_id(&self, sid: &str) -> Resolution<UserId> {
        let request = ResolveSessionRequest {
            sid: sid.to_string(),
        };
        self.call::<_, UserIdBody>(RESOLVE_SESSION_PATH, &request)
            .await
            .map(|body| body.user_id)
    }

    /// `ResolveRole`.
    pub async fn resolve_role(&self, user_id: UserId) -> Resolution<String> {
        let request = ResolveRoleRequest { user_id };
        self.call::<_, RoleBody>(RESOLVE_ROLE_PATH, &request)
            .await
            .map(|body| body.role)
    }

    async fn call<Req, Resp>(&self, path: &str, body: &Req) -> Resolution<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);

        let response = match self.http.post(&url).json(body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(path, error = %e, "Identity RPC call failed");
                return Resolution::Transient;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                warn!(path, error = %e, "Identity RPC returned an error status");
                return Resolution::Transient;
            }
        };

        match response.json::<Resolution<Resp>>().await {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!(path, error = %e, "Identity RPC response could not be decoded");
                Resolution::Transient
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_round_trip_over_tcp() {
        let f = Fixture::new().await;
        let (alice, sid) = f.login("alice", "user").await;
        let base_url = f.serve().await;

        let client = IdentityClient::new(&base_url, Duration::from_secs(5)).unwrap();
        assert_eq!(client.resolve_user_id(&sid).await, Resolution::Resolved(alice));
        assert_eq!(
            client.resolve_role(alice).await,
            Resolution::Resolved("user".to_string())
        );
        assert_eq!(client.resolve_user_id("forged").await, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transient() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = IdentityClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        assert_eq!(client.resolve_user_id("anything").await, Resolution::Transient);
    }

    #[tokio::test]
    async fn test_trailing_slash_is_tolerated() {
        let client = IdentityClient::new("http://127.0.0.1:8081/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8081");
    }
}
