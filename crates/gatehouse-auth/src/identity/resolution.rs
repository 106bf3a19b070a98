//! Tagged outcome of an identity lookup.

use serde::{Deserialize, Serialize};

use gatehouse_core::error::{AppError, ErrorKind};

/// Outcome of resolving a session or user id.
///
/// Serialized with an internal `status` tag so a resolved payload's fields
/// sit next to the tag: `{"status":"resolved","user_id":42}`. The payload
/// must therefore serialize as a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution<T> {
    /// The lookup succeeded.
    Resolved(T),
    /// The session or identity does not exist (or has expired).
    NotFound,
    /// The lookup could not be completed; the caller may retry.
    Transient,
}

impl<T> Resolution<T> {
    /// Classify a lookup result.
    ///
    /// Missing sessions and identities become `NotFound`; every other fault
    /// becomes `Transient`.
    pub fn from_result(result: Result<T, AppError>) -> Self {
        match result {
            Ok(value) => Self::Resolved(value),
            Err(e) if is_absence(e.kind) => Self::NotFound,
            Err(_) => Self::Transient,
        }
    }

    /// Transform the resolved value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Self::Resolved(value) => Resolution::Resolved(f(value)),
            Self::NotFound => Resolution::NotFound,
            Self::Transient => Resolution::Transient,
        }
    }

    /// The resolved value, if any.
    pub fn resolved(self) -> Option<T> {
        match self {
            Self::Resolved(value) => Some(value),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Resolved(_) => "resolved",
            Self::NotFound => "not_found",
            Self::Transient => "transient",
        }
    }
}

/// Whether an error means the subject does not exist, as opposed to a fault.
pub(crate) fn is_absence(kind: ErrorKind) -> bool {
    kind.is_session_rejection() || kind == ErrorKind::NotFound
}
