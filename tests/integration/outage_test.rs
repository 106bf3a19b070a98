//! Cache outages degrade to the relational store without failing logins.

use std::time::Duration;

use axum::http::StatusCode;

use gatehouse_auth::Resolution;
use gatehouse_cache::keys;
use gatehouse_core::traits::CacheProvider;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_login_survives_cache_outage_and_cache_is_repaired() {
    let app = TestApp::new().await;
    app.signup("alice").await;
    let alice = app.user_id("alice").await;

    app.cache.set_down(true);
    let login = app.login("alice").await;
    assert_eq!(login.status, StatusCode::OK);
    let sid = login.sid();

    assert_eq!(app.rpc.resolve_user_id(&sid).await, Resolution::Resolved(alice));
    // The repair attempt runs in the background and must fail while down.
    tokio::time::sleep(Duration::from_millis(50)).await;

    app.cache.set_down(false);
    let key = keys::session_by_sid(&sid);
    assert!(!app.cache.exists(&key).await.unwrap());

    assert_eq!(app.rpc.resolve_user_id(&sid).await, Resolution::Resolved(alice));
    app.cache.wait_for(&key, true).await;
}

#[tokio::test]
async fn test_evicted_cache_entry_falls_back_to_relational_store() {
    let app = TestApp::new().await;
    app.signup("alice").await;
    let alice = app.user_id("alice").await;
    let sid = app.login("alice").await.sid();

    app.cache.delete(&keys::session_by_sid(&sid)).await.unwrap();
    assert_eq!(app.rpc.resolve_user_id(&sid).await, Resolution::Resolved(alice));
}

#[tokio::test]
async fn test_health_reports_cache_outage() {
    let app = TestApp::new().await;

    let healthy = app.request("GET", "/health", None, None).await;
    assert_eq!(healthy.status, StatusCode::OK);

    app.cache.set_down(true);
    let degraded = app.request("GET", "/health", None, None).await;
    assert_eq!(degraded.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(degraded.body["cache"], "unavailable");
}
