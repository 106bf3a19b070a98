//! Session identifier generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

/// Number of random bytes behind every sid.
pub const SID_BYTES: usize = 32;

/// Source of fresh session identifiers.
pub trait SidGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Produce a new identifier. Uniqueness is enforced by the store, not here.
    fn generate(&self) -> String;
}

/// 256 bits from the OS CSPRNG, base64url without padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSid;

impl SidGenerator for RandomSid {
    fn generate(&self) -> String {
        let mut buf = [0u8; SID_BYTES];
        OsRng.fill_bytes(&mut buf);
        URL_SAFE_NO_PAD.encode(buf)
    }
}
