//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A login session as stored in the relational store.
///
/// Sessions are created on login and destroyed on logout, or lazily once
/// a lookup finds them expired. The relational row is authoritative over
/// any cached copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Login of the owning identity.
    pub login: String,
    /// Opaque session handle carried in the client cookie.
    pub sid: String,
    /// Absolute expiry instant.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is still valid at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Time left until expiry at `now`, zero once expired.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        (self.expires_at - now).max(chrono::Duration::zero())
    }
}

/// First eight characters of a sid. Full sids never go to the logs.
pub fn sid_prefix(sid: &str) -> &str {
    match sid.char_indices().nth(8) {
        Some((idx, _)) => &sid[..idx],
        None => sid,
    }
}
