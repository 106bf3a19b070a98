//! # gatehouse-core
//!
//! Core crate for Gatehouse. Contains configuration schemas, the unified
//! error system, the connectivity supervisor shared by every store adapter,
//! deadline helpers, and the traits other crates implement.
//!
//! This crate has **no** internal dependencies on other Gatehouse crates.

pub mod config;
pub mod connectivity;
pub mod deadline;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
