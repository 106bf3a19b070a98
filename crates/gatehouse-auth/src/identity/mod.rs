//! Identity resolution and account operations.

pub mod account;
pub mod resolution;
pub mod service;

pub use account::AccountService;
pub use resolution::Resolution;
pub use service::IdentityService;
