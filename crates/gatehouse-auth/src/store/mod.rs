//! Persistence seams used by the session manager and identity service.
//!
//! Production binds these to the Postgres repositories; tests and
//! single-node development bind them to the in-memory implementations.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use gatehouse_core::result::AppResult;
use gatehouse_entity::identity::{Identity, NewIdentity, UserId};
use gatehouse_entity::session::Session;

pub use memory::{MemoryIdentityStore, MemorySessionStore};

/// Durable session storage. The authoritative copy of every session.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new session. A sid that already exists yields `Conflict`.
    async fn insert(&self, session: &Session) -> AppResult<()>;

    /// Look up a session by sid, regardless of expiry.
    async fn find_by_sid(&self, sid: &str) -> AppResult<Option<Session>>;

    /// Remove a session. Returns whether one was removed.
    async fn delete_by_sid(&self, sid: &str) -> AppResult<bool>;
}

/// Durable identity storage.
#[async_trait]
pub trait IdentityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Register an identity. A taken login yields `Conflict`.
    async fn create(&self, data: &NewIdentity) -> AppResult<Identity>;

    /// Look up an identity by login.
    async fn find_by_login(&self, login: &str) -> AppResult<Option<Identity>>;

    /// Look up an identity by numeric id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Identity>>;

    /// Change an identity's role. Returns `false` for an unknown login.
    async fn update_role(&self, login: &str, role: &str) -> AppResult<bool>;
}
