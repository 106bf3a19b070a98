//! Repository implementations for identities and sessions.

pub mod identity;
pub mod session;

pub use identity::IdentityRepository;
pub use session::SessionRepository;

use gatehouse_core::error::{AppError, ErrorKind};

/// Map a sqlx error, turning unique-constraint violations into `Conflict`.
pub(crate) fn map_write_error(context: &str, err: sqlx::Error) -> AppError {
    let unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        AppError::with_source(ErrorKind::Conflict, format!("{context}: already exists"), err)
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), err)
    }
}
