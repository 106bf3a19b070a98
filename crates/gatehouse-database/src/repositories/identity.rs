//! Identity repository implementation.

use sqlx::PgPool;

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_entity::identity::{Identity, NewIdentity, UserId};

use super::map_write_error;

/// Repository for identity lookups and registration.
#[derive(Debug, Clone)]
pub struct IdentityRepository {
    pool: PgPool,
}

impl IdentityRepository {
    /// Create a new identity repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an identity by its numeric id.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<Identity>> {
        sqlx::query_as::<_, Identity>(
            "SELECT id, login, password_hash, role, created_at FROM identities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find identity by id", e))
    }

    /// Find an identity by login.
    pub async fn find_by_login(&self, login: &str) -> AppResult<Option<Identity>> {
        sqlx::query_as::<_, Identity>(
            "SELECT id, login, password_hash, role, created_at FROM identities WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find identity by login", e)
        })
    }

    /// Register a new identity. A taken login yields `Conflict`.
    pub async fn create(&self, data: &NewIdentity) -> AppResult<Identity> {
        sqlx::query_as::<_, Identity>(
            "INSERT INTO identities (login, password_hash, role) VALUES ($1, $2, $3) \
             RETURNING id, login, password_hash, role, created_at",
        )
        .bind(&data.login)
        .bind(&data.password_hash)
        .bind(&data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error("Failed to create identity", e))
    }

    /// Change the role of an identity. Returns `false` if the login is unknown.
    pub async fn update_role(&self, login: &str, role: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE identities SET role = $1 WHERE login = $2")
            .bind(role)
            .bind(login)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update identity role", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
