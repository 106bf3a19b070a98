//! # gatehouse-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for identities and sessions.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{IdentityRepository, SessionRepository};
