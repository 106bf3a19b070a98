//! # gatehouse-entity
//!
//! Domain entity models for Gatehouse. Relational rows derive
//! `sqlx::FromRow`; the cache projection of a session is a plain serde value.

pub mod identity;
pub mod session;

pub use identity::{Identity, NewIdentity, UserId};
pub use session::{CachedSession, Session};
