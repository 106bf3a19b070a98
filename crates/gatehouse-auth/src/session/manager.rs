//! Session lifecycle manager: create, validate and destroy sessions across
//! the relational store and the cache.
//!
//! The relational store is authoritative. The cache is a projection: it is
//! written after the relational row and read first on validation. A miss is
//! repaired from the relational row in a background task, and an entry is
//! evicted whenever it disagrees with the relational row.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use gatehouse_cache::keys;
use gatehouse_core::config::SessionConfig;
use gatehouse_core::deadline::with_deadline;
use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::{CacheProvider, Clock, SystemClock};
use gatehouse_entity::session::{CachedSession, Session, sid_prefix};

use crate::store::SessionStore;

use super::sid::{RandomSid, SidGenerator};

/// Attempts at finding a sid the relational store accepts.
const MAX_SID_ATTEMPTS: u32 = 5;

/// Manages the complete session lifecycle.
#[derive(Clone)]
pub struct SessionManager {
    /// Authoritative session storage.
    sessions: Arc<dyn SessionStore>,
    /// Session projection cache.
    cache: Arc<dyn CacheProvider>,
    /// Time source for expiry decisions.
    clock: Arc<dyn Clock>,
    /// Source of fresh sids.
    sids: Arc<dyn SidGenerator>,
    /// Session lifetime from login.
    ttl: Duration,
    /// Upper bound on cache entry TTL, in seconds.
    cache_ttl_cap: Option<u64>,
    /// Deadline applied to each store call.
    op_timeout: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .field("cache_ttl_cap", &self.cache_ttl_cap)
            .field("op_timeout", &self.op_timeout)
            .finish()
    }
}

impl SessionManager {
    /// Creates a session manager using the system clock and random sids.
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        cache: Arc<dyn CacheProvider>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            sessions,
            cache,
            clock: Arc::new(SystemClock),
            sids: Arc::new(RandomSid),
            ttl: config.ttl(),
            cache_ttl_cap: config.cache_ttl_cap_seconds,
            op_timeout: config.operation_timeout(),
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the sid generator.
    pub fn with_sid_generator(mut self, sids: Arc<dyn SidGenerator>) -> Self {
        self.sids = sids;
        self
    }

    /// Session lifetime from login.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The current instant according to the injected clock.
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Issues a new session for `login`.
    ///
    /// The relational row is written first; if that fails nothing is cached
    /// and the error is `StoreWrite`. A failed cache write is logged and the
    /// session is returned anyway.
    pub async fn create_session(&self, login: &str) -> AppResult<Session> {
        let ttl = chrono::Duration::from_std(self.ttl).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Session TTL out of range", e)
        })?;
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::configuration("Session TTL out of range"))?;

        for attempt in 1..=MAX_SID_ATTEMPTS {
            let session = Session {
                login: login.to_string(),
                sid: self.sids.generate(),
                expires_at,
            };

            match self.store_call("session insert", self.sessions.insert(&session)).await {
                Ok(()) => {
                    if let Err(e) = self.write_cache(&session).await {
                        warn!(
                            login = %login,
                            sid = %sid_prefix(&session.sid),
                            error = %e,
                            "Session cache write failed; relational copy remains authoritative"
                        );
                    }
                    info!(
                        login = %login,
                        sid = %sid_prefix(&session.sid),
                        expires_at = %session.expires_at,
                        "Session created"
                    );
                    return Ok(session);
                }
                Err(e) if e.kind == ErrorKind::Conflict => {
                    warn!(login = %login, attempt, "Generated sid already taken, regenerating");
                }
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::StoreWrite,
                        "Failed to persist session",
                        e,
                    ));
                }
            }
        }

        Err(AppError::store_write(format!(
            "No unique session id after {MAX_SID_ATTEMPTS} attempts"
        )))
    }

    /// Resolves `sid` to the owning login.
    ///
    /// Fails with `SessionNotFound` for an unknown or empty sid and with
    /// `SessionExpired` when the relational record has expired. Relational
    /// store faults are propagated so callers can fail closed.
    pub async fn validate_session(&self, sid: &str) -> AppResult<String> {
        if sid.is_empty() {
            return Err(AppError::session_not_found());
        }

        let key = keys::session_by_sid(sid);
        let now = self.clock.now();

        if let Some(cached) = self.read_cache(sid, &key).await {
            if cached.is_live_at(now) {
                debug!(sid = %sid_prefix(sid), "Session cache hit");
                return Ok(cached.login);
            }
            debug!(sid = %sid_prefix(sid), "Cached session expired, consulting relational store");
            self.evict_logged(sid, &key).await;
        }

        let session = match self
            .store_call("session lookup", self.sessions.find_by_sid(sid))
            .await?
        {
            Some(session) => session,
            None => {
                debug!(sid = %sid_prefix(sid), "Session not found");
                return Err(AppError::session_not_found());
            }
        };

        if !session.is_live_at(now) {
            if let Err(e) = self
                .store_call("expired session delete", self.sessions.delete_by_sid(sid))
                .await
            {
                warn!(sid = %sid_prefix(sid), error = %e, "Failed to purge expired session");
            }
            self.evict_logged(sid, &key).await;
            info!(sid = %sid_prefix(sid), login = %session.login, "Session expired");
            return Err(AppError::session_expired());
        }

        let login = session.login.clone();
        self.spawn_repair(session);
        Ok(login)
    }

    /// Removes the session from both stores. Absent sessions are not an error.
    ///
    /// The cache entry is evicted before the relational row is deleted. If
    /// that eviction fails the relational row is left in place, so the two
    /// stores never disagree about a session that is still cached. A second
    /// eviction after the relational delete drops any entry a concurrent
    /// repair wrote in between.
    pub async fn destroy_session(&self, sid: &str) -> AppResult<()> {
        if sid.is_empty() {
            return Ok(());
        }

        let key = keys::session_by_sid(sid);
        self.evict(&key).await.map_err(|e| {
            warn!(sid = %sid_prefix(sid), error = %e, "Cache eviction failed, session kept");
            e
        })?;

        let removed = self
            .store_call("session delete", self.sessions.delete_by_sid(sid))
            .await?;

        self.evict(&key).await?;

        info!(sid = %sid_prefix(sid), removed, "Session destroyed");
        Ok(())
    }

    /// Runs a relational store call under the operation deadline.
    async fn store_call<T, F>(&self, operation: &str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        with_deadline(self.op_timeout, operation, fut).await
    }

    /// Reads the cached projection. Any failure counts as a miss.
    async fn read_cache(&self, sid: &str, key: &str) -> Option<CachedSession> {
        let raw = match with_deadline(self.op_timeout, "cache read", self.cache.get(key)).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(sid = %sid_prefix(sid), error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str::<CachedSession>(&raw) {
            Ok(cached) => Some(cached),
            Err(e) => {
                warn!(sid = %sid_prefix(sid), error = %e, "Corrupt cache entry, evicting");
                self.evict_logged(sid, key).await;
                None
            }
        }
    }

    /// Writes the cache projection with a TTL bounded by the session expiry.
    async fn write_cache(&self, session: &Session) -> AppResult<()> {
        let remaining = session.remaining_at(self.clock.now()).num_seconds();
        let mut seconds = u64::try_from(remaining).unwrap_or(0);
        if let Some(cap) = self.cache_ttl_cap {
            seconds = seconds.min(cap);
        }
        if seconds == 0 {
            return Ok(());
        }

        let value = serde_json::to_string(&CachedSession::from(session))?;
        let key = keys::session_by_sid(&session.sid);
        with_deadline(
            self.op_timeout,
            "cache write",
            self.cache.set(&key, &value, Duration::from_secs(seconds)),
        )
        .await
    }

    /// Schedules the write-through repair without holding up the caller.
    fn spawn_repair(&self, session: Session) {
        let manager = self.clone();
        tokio::spawn(async move {
            manager.repair_cache(&session).await;
        });
    }

    /// Write-through repair after a relational hit.
    ///
    /// Re-reads the relational row afterwards and evicts the fresh entry if
    /// the session was destroyed in between.
    async fn repair_cache(&self, session: &Session) {
        if let Err(e) = self.write_cache(session).await {
            warn!(sid = %sid_prefix(&session.sid), error = %e, "Cache repair failed");
            return;
        }

        let key = keys::session_by_sid(&session.sid);

        match self
            .store_call("session recheck", self.sessions.find_by_sid(&session.sid))
            .await
        {
            Ok(Some(_)) => {
                debug!(sid = %sid_prefix(&session.sid), "Session cache repaired");
            }
            Ok(None) => {
                debug!(sid = %sid_prefix(&session.sid), "Session vanished during repair, evicting");
                self.evict_logged(&session.sid, &key).await;
            }
            Err(e) => {
                warn!(
                    sid = %sid_prefix(&session.sid),
                    error = %e,
                    "Could not recheck session after cache repair"
                );
            }
        }
    }

    /// Deletes a cache entry under the operation deadline.
    async fn evict(&self, key: &str) -> AppResult<()> {
        with_deadline(self.op_timeout, "cache delete", self.cache.delete(key)).await
    }

    /// Best-effort cache eviction on the read path.
    async fn evict_logged(&self, sid: &str, key: &str) {
        if let Err(e) = self.evict(key).await {
            warn!(sid = %sid_prefix(sid), error = %e, "Failed to evict cache entry");
        }
    }
}
