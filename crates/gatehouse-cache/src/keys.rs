//! Cache key builders for all Gatehouse cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Prefix applied to all Gatehouse cache keys.
const PREFIX: &str = "gatehouse";

/// Cache key for a session projection by sid.
pub fn session_by_sid(sid: &str) -> String {
    format!("{PREFIX}:session:{sid}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key() {
        assert_eq!(session_by_sid("abc123"), "gatehouse:session:abc123");
    }
}
