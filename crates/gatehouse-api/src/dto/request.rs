//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login name.
    #[validate(length(min = 1, message = "Login is required"))]
    pub login: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request body.
///
/// Password strength is enforced by the account service; only shape is
/// checked here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    /// Desired login name.
    #[validate(length(min = 3, max = 64, message = "Login must be 3 to 64 characters"))]
    pub login: String,
    /// Password.
    #[validate(length(min = 1, max = 256, message = "Password is required"))]
    pub password: String,
}
