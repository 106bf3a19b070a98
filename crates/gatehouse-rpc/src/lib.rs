//! # gatehouse-rpc
//!
//! The internal identity protocol between Gatehouse and the services that
//! rely on it.
//!
//! - `wire` — request and response bodies, route paths
//! - `server` — axum router answering `resolve-session` and `resolve-role`
//! - `client` — reqwest-based client for consuming services
//! - `resolver` — the `IdentityResolver` seam the middleware calls through
//! - `middleware` — cookie → identity authorization gate for consumer routers

pub mod client;
pub mod middleware;
pub mod resolver;
pub mod server;
pub mod wire;

#[cfg(test)]
pub(crate) mod testing;

pub use client::IdentityClient;
pub use middleware::{AuthGate, AuthenticatedIdentity, require_identity, require_role};
pub use resolver::IdentityResolver;
pub use server::{RpcState, build_rpc_router};
