//! Cache projection of a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::Session;

/// Value stored in the cache under the session key.
///
/// The sid is the key, so only the owner and expiry are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSession {
    /// Login of the owning identity.
    pub login: String,
    /// Absolute expiry instant, copied from the relational row.
    pub expires_at: DateTime<Utc>,
}

impl CachedSession {
    /// Whether the cached copy is still valid at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl From<&Session> for CachedSession {
    fn from(session: &Session) -> Self {
        Self {
            login: session.login.clone(),
            expires_at: session.expires_at,
        }
    }
}
