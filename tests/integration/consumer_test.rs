//! A consuming service guarded by the authorization middleware, resolving
//! identities over the RPC listener.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use gatehouse_rpc::{AuthGate, AuthenticatedIdentity, IdentityClient, require_identity, require_role};

use crate::helpers::{TestApp, send};

async fn profile(identity: AuthenticatedIdentity) -> String {
    identity.user_id.to_string()
}

async fn admin_panel(identity: AuthenticatedIdentity) -> Response {
    match require_role(&identity, "admin") {
        Ok(()) => "admin panel".into_response(),
        Err(rejection) => rejection,
    }
}

fn consumer(rpc_url: &str) -> Router {
    let client = IdentityClient::new(rpc_url, Duration::from_secs(5)).unwrap();
    let gate = AuthGate::new(Arc::new(client), "session_id").with_role();

    Router::new()
        .route("/profile", get(profile))
        .route("/admin", get(admin_panel))
        .layer(from_fn_with_state(gate, require_identity))
}

#[tokio::test]
async fn test_consumer_sees_numeric_identity() {
    let app = TestApp::new().await;
    let signup = app.signup("alice").await;
    let alice = app.user_id("alice").await;

    let response = send(consumer(&app.rpc_url), "GET", "/profile", None, Some(&signup.cookie())).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, serde_json::json!(alice));
}

#[tokio::test]
async fn test_consumer_rejects_missing_and_revoked_sessions() {
    let app = TestApp::new().await;
    let signup = app.signup("alice").await;

    let anonymous = send(consumer(&app.rpc_url), "GET", "/profile", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    app.request("POST", "/logout", None, Some(&signup.cookie())).await;
    let revoked = send(consumer(&app.rpc_url), "GET", "/profile", None, Some(&signup.cookie())).await;
    assert_eq!(revoked.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_change_takes_effect_on_next_request() {
    let app = TestApp::new().await;
    let signup = app.signup("alice").await;

    let before = send(consumer(&app.rpc_url), "GET", "/admin", None, Some(&signup.cookie())).await;
    assert_eq!(before.status, StatusCode::FORBIDDEN);

    app.state.accounts.set_role("alice", "admin").await.unwrap();
    let after = send(consumer(&app.rpc_url), "GET", "/admin", None, Some(&signup.cookie())).await;
    assert_eq!(after.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unreachable_identity_service_fails_closed() {
    let app = TestApp::new().await;
    let signup = app.signup("alice").await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let response = send(consumer(&dead), "GET", "/profile", None, Some(&signup.cookie())).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
