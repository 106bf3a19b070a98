//! Session repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_entity::session::Session;

use super::map_write_error;

/// Repository for session rows. The `sid` column carries a unique index.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a session. A duplicate sid yields `Conflict`.
    pub async fn insert(&self, session: &Session) -> AppResult<()> {
        sqlx::query("INSERT INTO sessions (login, sid, expires_at) VALUES ($1, $2, $3)")
            .bind(&session.login)
            .bind(&session.sid)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error("Failed to insert session", e))?;
        Ok(())
    }

    /// Find a session by sid, expired or not.
    pub async fn find_by_sid(&self, sid: &str) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT login, sid, expires_at FROM sessions WHERE sid = $1",
        )
        .bind(sid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// Delete a session by sid. Returns whether a row was removed.
    pub async fn delete_by_sid(&self, sid: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE sid = $1")
            .bind(sid)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete session", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every session that expired before `now`. Returns the number removed.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete expired sessions", e)
            })?;
        Ok(result.rows_affected())
    }
}
