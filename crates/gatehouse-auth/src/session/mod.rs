//! Session lifecycle: id generation and the dual-store manager.

pub mod manager;
pub mod sid;

pub use manager::SessionManager;
pub use sid::{RandomSid, SidGenerator};
