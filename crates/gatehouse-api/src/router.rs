//! Route definitions for the public HTTP API and the internal RPC listener.

use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use gatehouse_rpc::{RpcState, build_rpc_router};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the public router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .route("/login", post(handlers::session::login))
        .route("/logout", post(handlers::session::logout))
        .route("/signup", post(handlers::session::signup))
        .route("/authcheck", get(handlers::session::authcheck))
        .route("/health", get(handlers::health::health))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Build the internal identity RPC router.
pub fn build_internal_router(state: RpcState) -> Router {
    build_rpc_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
}
