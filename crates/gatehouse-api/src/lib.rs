//! # gatehouse-api
//!
//! Public HTTP surface of Gatehouse built on Axum, plus the process wiring
//! that supervises the stores and runs the HTTP and identity RPC listeners
//! side by side.

pub mod app;
pub mod cookie;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Services, run_server, serve};
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
