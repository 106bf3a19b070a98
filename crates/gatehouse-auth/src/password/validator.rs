//! Password policy enforcement for new passwords.

use gatehouse_core::config::SessionConfig;
use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;

/// Validates password strength against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from session configuration.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password against the length and entropy policy.
    ///
    /// `login` is passed to the entropy estimator so passwords derived from
    /// it score low.
    pub fn validate(&self, login: &str, password: &str) -> AppResult<()> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        let estimate = zxcvbn::zxcvbn(password, &[login]);
        if estimate.score() < zxcvbn::Score::Three {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password with more entropy.",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gatehouse_core::error::ErrorKind;

    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&SessionConfig::default())
    }

    #[test]
    fn test_rejects_short_password() {
        let err = validator().validate("alice", "abc").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("at least 8"));
    }

    #[test]
    fn test_rejects_weak_password() {
        let err = validator().validate("alice", "password1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_accepts_strong_password() {
        assert!(
            validator()
                .validate("alice", "correct-Horse-battery-staple-91")
                .is_ok()
        );
    }
}
