//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use gatehouse_auth::{AccountService, SessionManager};
use gatehouse_core::config::AppConfig;
use gatehouse_core::traits::CacheProvider;
use gatehouse_database::DatabasePool;

/// Shared state for the public HTTP router.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Dual-store session lifecycle.
    pub sessions: Arc<SessionManager>,
    /// Credential verification and registration.
    pub accounts: Arc<AccountService>,
    /// Relational store handle, absent when running on in-memory stores.
    pub database: Option<DatabasePool>,
    /// Cache store handle.
    pub cache: Arc<dyn CacheProvider>,
}
