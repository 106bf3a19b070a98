//! Session domain entities.

pub mod cached;
pub mod model;

pub use cached::CachedSession;
pub use model::{Session, sid_prefix};
