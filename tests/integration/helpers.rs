//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use gatehouse_api::{AppState, Services, build_router};
use gatehouse_auth::{
    AccountService, IdentityService, MemoryIdentityStore, MemorySessionStore, SessionManager,
};
use gatehouse_cache::memory::MemoryCacheProvider;
use gatehouse_core::config::{AppConfig, MemoryCacheConfig};
use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::{CacheProvider, ManualClock};
use gatehouse_rpc::{IdentityClient, RpcState};

/// Password that satisfies the default policy.
pub const STRONG: &str = "correct-Horse-battery-staple-91";

/// Memory cache that can be switched off to simulate an outage.
#[derive(Debug)]
pub struct SwitchableCache {
    inner: MemoryCacheProvider,
    down: AtomicBool,
}

impl SwitchableCache {
    pub fn new() -> Self {
        Self {
            inner: MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1_000 }),
            down: AtomicBool::new(false),
        }
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Waits for background cache repairs until `key`'s presence matches.
    pub async fn wait_for(&self, key: &str, present: bool) {
        for _ in 0..200 {
            if self.inner.exists(key).await.unwrap() == present {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("cache key {key} never became present={present}");
    }

    fn check(&self) -> AppResult<()> {
        if self.down.load(Ordering::SeqCst) {
            Err(AppError::cache("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheProvider for SwitchableCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.check()?;
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.check()?;
        self.inner.exists(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.down.load(Ordering::SeqCst))
    }
}

/// HTTP response captured for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` pair to send back in a `Cookie` header.
    pub fn cookie(&self) -> String {
        self.set_cookie
            .as_deref()
            .and_then(|c| c.split(';').next())
            .unwrap_or_default()
            .to_string()
    }

    /// Session id carried by the cookie.
    pub fn sid(&self) -> String {
        self.cookie()
            .split_once('=')
            .map(|(_, sid)| sid.to_string())
            .unwrap_or_default()
    }
}

/// Full Gatehouse stack on in-memory stores, listening on ephemeral ports.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub cache: Arc<SwitchableCache>,
    pub sessions: Arc<MemorySessionStore>,
    pub rpc: IdentityClient,
    pub rpc_url: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = AppConfig::default();
        let clock = Arc::new(ManualClock::starting_now());
        let cache = Arc::new(SwitchableCache::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let identities = Arc::new(MemoryIdentityStore::new());

        let session_manager = Arc::new(
            SessionManager::new(sessions.clone(), cache.clone(), &config.session)
                .with_clock(clock.clone()),
        );
        let accounts = Arc::new(AccountService::new(identities.clone(), &config.session));
        let identity = Arc::new(IdentityService::new(
            session_manager.clone(),
            identities,
            config.session.operation_timeout(),
        ));

        let rpc_state = RpcState::new(identity, &config.rpc);
        let state = AppState {
            config: Arc::new(config),
            sessions: session_manager,
            accounts,
            database: None,
            cache: cache.clone(),
        };

        let http = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let rpc = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let rpc_url = format!("http://{}", rpc.local_addr().unwrap());
        let services = Services {
            app: state.clone(),
            rpc: rpc_state,
        };
        tokio::spawn(async move {
            let _ = gatehouse_api::serve(http, rpc, services).await;
        });

        Self {
            router: build_router(state.clone()),
            state,
            clock,
            cache,
            sessions,
            rpc: IdentityClient::new(&rpc_url, Duration::from_secs(5)).unwrap(),
            rpc_url,
        }
    }

    /// Send a request to the public router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        send(self.router.clone(), method, path, body, cookie).await
    }

    pub async fn signup(&self, login: &str) -> TestResponse {
        let response = self
            .request(
                "POST",
                "/signup",
                Some(serde_json::json!({"login": login, "password": STRONG})),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "signup failed: {}", response.body);
        response
    }

    pub async fn login(&self, login: &str) -> TestResponse {
        self.request(
            "POST",
            "/login",
            Some(serde_json::json!({"login": login, "password": STRONG})),
            None,
        )
        .await
    }

    pub async fn user_id(&self, login: &str) -> i64 {
        self.state.accounts.find(login).await.unwrap().id
    }
}

/// Send a request to any router.
pub async fn send(
    router: Router,
    method: &str,
    path: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse {
        status,
        set_cookie,
        body,
    }
}
