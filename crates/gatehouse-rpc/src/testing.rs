//! Shared fixture for the RPC tests: in-memory stores behind a real
//! `IdentityService`.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use gatehouse_auth::{IdentityService, IdentityStore, MemoryIdentityStore, MemorySessionStore, SessionManager};
use gatehouse_cache::memory::MemoryCacheProvider;
use gatehouse_core::config::{MemoryCacheConfig, SessionConfig};
use gatehouse_entity::identity::{NewIdentity, UserId};

use crate::server::{RpcState, build_rpc_router};

pub(crate) struct Fixture {
    pub identity: Arc<IdentityService>,
    pub sessions: Arc<SessionManager>,
    pub identities: MemoryIdentityStore,
}

impl Fixture {
    pub async fn new() -> Self {
        let config = SessionConfig::default();
        let cache = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 100 }));
        let sessions = Arc::new(SessionManager::new(
            Arc::new(MemorySessionStore::new()),
            cache,
            &config,
        ));
        let identities = MemoryIdentityStore::new();
        let identity = Arc::new(IdentityService::new(
            sessions.clone(),
            Arc::new(identities.clone()),
            config.operation_timeout(),
        ));
        Self {
            identity,
            sessions,
            identities,
        }
    }

    /// Registers `login` with `role` and opens a session for it.
    pub async fn login(&self, login: &str, role: &str) -> (UserId, String) {
        let id = self
            .identities
            .create(&NewIdentity {
                login: login.to_string(),
                password_hash: "hash".to_string(),
                role: role.to_string(),
            })
            .await
            .unwrap()
            .id;
        let session = self.sessions.create_session(login).await.unwrap();
        (id, session.sid)
    }

    pub fn router(&self) -> Router {
        build_rpc_router(RpcState {
            identity: self.identity.clone(),
            deadline: Duration::from_secs(2),
        })
    }

    /// Serves the RPC router on an ephemeral port and returns its base URL.
    pub async fn serve(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = self.router();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }
}
