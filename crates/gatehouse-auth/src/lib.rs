//! # gatehouse-auth
//!
//! Session lifecycle and identity resolution for Gatehouse.
//!
//! ## Modules
//!
//! - `store` — persistence seams (`SessionStore`, `IdentityStore`) with
//!   Postgres and in-memory implementations
//! - `session` — session id generation and the dual-store `SessionManager`
//! - `identity` — sid → user id → role resolution and account operations
//! - `password` — Argon2id password hashing and policy enforcement

pub mod identity;
pub mod password;
pub mod session;
pub mod store;

pub use identity::{AccountService, IdentityService, Resolution};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::{RandomSid, SessionManager, SidGenerator};
pub use store::{IdentityStore, MemoryIdentityStore, MemorySessionStore, SessionStore};
