//! Core traits defined in `gatehouse-core` and implemented by other crates.

pub mod cache;
pub mod clock;
pub mod probe;

pub use cache::CacheProvider;
pub use clock::{Clock, ManualClock, SystemClock};
pub use probe::Probe;
