//! Well-known role names.
//!
//! Roles are free-form strings owned by downstream services; these are the
//! ones Gatehouse itself refers to.

/// Role given to self-registered identities unless configured otherwise.
pub const DEFAULT: &str = "user";

/// Administrative role.
pub const ADMIN: &str = "admin";

/// Normalise a role string before it is stored.
pub fn normalize(role: &str) -> String {
    role.trim().to_lowercase()
}
