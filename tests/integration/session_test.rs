//! Login, resolution and logout across the HTTP and RPC listeners.

use axum::http::StatusCode;

use gatehouse_auth::Resolution;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_alice_resolves_until_session_expires() {
    let app = TestApp::new().await;
    app.signup("alice").await;
    let alice = app.user_id("alice").await;

    let login = app.login("alice").await;
    assert_eq!(login.status, StatusCode::OK);
    let sid = login.sid();
    assert!(!sid.is_empty());

    let expires_at: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(login.body["data"]["expires_at"].clone()).unwrap();
    assert_eq!(expires_at, app.state.sessions.now() + chrono::Duration::hours(1));

    assert_eq!(app.rpc.resolve_user_id(&sid).await, Resolution::Resolved(alice));
    assert_eq!(
        app.rpc.resolve_role(alice).await,
        Resolution::Resolved("user".to_string())
    );

    app.clock.advance(chrono::Duration::hours(1));
    assert_eq!(app.rpc.resolve_user_id(&sid).await, Resolution::NotFound);
    // Only the signup session row is left.
    assert_eq!(app.sessions.len(), 1);

    let check = app.request("GET", "/authcheck", None, Some(&login.cookie())).await;
    assert_eq!(check.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_session_everywhere() {
    let app = TestApp::new().await;
    app.signup("alice").await;
    let login = app.login("alice").await;
    let sid = login.sid();

    let logout = app
        .request("POST", "/logout", None, Some(&login.cookie()))
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert!(logout.set_cookie.unwrap_or_default().contains("Max-Age=0"));

    assert_eq!(app.rpc.resolve_user_id(&sid).await, Resolution::NotFound);

    let again = app
        .request("POST", "/logout", None, Some(&login.cookie()))
        .await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_each_login_gets_a_distinct_session() {
    let app = TestApp::new().await;
    app.signup("alice").await;

    let first = app.login("alice").await.sid();
    let second = app.login("alice").await.sid();
    assert_ne!(first, second);

    let alice = app.user_id("alice").await;
    assert_eq!(app.rpc.resolve_user_id(&first).await, Resolution::Resolved(alice));
    assert_eq!(app.rpc.resolve_user_id(&second).await, Resolution::Resolved(alice));
}

#[tokio::test]
async fn test_forged_sid_never_resolves() {
    let app = TestApp::new().await;
    assert_eq!(app.rpc.resolve_user_id("not-a-session").await, Resolution::NotFound);
    assert_eq!(app.rpc.resolve_user_id("").await, Resolution::NotFound);
    assert_eq!(app.rpc.resolve_role(12345).await, Resolution::NotFound);
}
