//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatehouse_entity::Session;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Returned by login and signup. The sid itself travels only in the cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Authenticated login.
    pub login: String,
    /// When the session stops validating.
    pub expires_at: DateTime<Utc>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            login: session.login.clone(),
            expires_at: session.expires_at,
        }
    }
}

/// Returned by the session check endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCheckResponse {
    /// Login owning the presented session.
    pub login: String,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when every store answers, `"degraded"` otherwise.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Relational store status.
    pub database: String,
    /// Cache store status.
    pub cache: String,
}
