//! Identity entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Numeric surrogate key of an identity, stable for its lifetime.
pub type UserId = i64;

/// A registered login with its role.
///
/// `id` is assigned once by the database sequence and never reused; it is
/// the handle downstream services store as a foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Identity {
    /// Surrogate key exposed over the identity RPC.
    pub id: UserId,
    /// Unique, immutable login.
    pub login: String,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Classification string consumed by downstream services.
    pub role: String,
    /// When the identity was registered.
    pub created_at: DateTime<Utc>,
}

/// Data required to register an identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    /// Unique login.
    pub login: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Initial role.
    pub role: String,
}
