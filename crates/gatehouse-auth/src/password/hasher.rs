//! Argon2id credential hashing.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;

/// Hash checked when the login is unknown, so a miss costs one verification
/// like a hit does. Derived once per process from a throwaway password.
pub(crate) static DECOY_HASH: OnceLock<String> = OnceLock::new();

/// Hashes and checks identity passwords as PHC strings.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    /// Argon2id v1.3 with the crate's recommended cost parameters.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    fn argon(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Produce the PHC string stored in `identities.password_hash`.
    pub fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon()
            .hash_password(password.as_bytes(), &salt)
            .map(|phc| phc.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Check `password` against a stored PHC string.
    ///
    /// A mismatch is `Ok(false)`; an unparsable hash is an internal error.
    pub fn verify(&self, password: &str, phc: &str) -> AppResult<bool> {
        let stored = PasswordHash::new(phc)
            .map_err(|e| AppError::internal(format!("Stored password hash is malformed: {e}")))?;

        match self.argon().verify_password(password.as_bytes(), &stored) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!("Password verification failed: {e}"))),
        }
    }

    /// Spend one verification on the decoy hash and report a mismatch.
    pub fn verify_decoy(&self, password: &str) -> AppResult<bool> {
        let decoy = match DECOY_HASH.get() {
            Some(decoy) => decoy,
            None => {
                let fresh = self.hash("gatehouse-decoy-credential")?;
                DECOY_HASH.get_or_init(|| fresh)
            }
        };
        self.verify(password, decoy)?;
        Ok(false)
    }
}
