//! Credential checks and identity administration.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use gatehouse_core::config::SessionConfig;
use gatehouse_core::deadline::with_deadline;
use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_entity::identity::{Identity, NewIdentity, role};

use crate::password::{PasswordHasher, PasswordValidator};
use crate::store::IdentityStore;

/// Message for every credential failure, so unknown logins and wrong
/// passwords are indistinguishable.
const INVALID_CREDENTIALS: &str = "Invalid login or password";

/// Registers identities and verifies their credentials.
#[derive(Debug, Clone)]
pub struct AccountService {
    identities: Arc<dyn IdentityStore>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    default_role: String,
    op_timeout: Duration,
}

impl AccountService {
    /// Creates an account service over `identities`.
    pub fn new(identities: Arc<dyn IdentityStore>, config: &SessionConfig) -> Self {
        Self {
            identities,
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(config),
            default_role: role::normalize(&config.default_role),
            op_timeout: config.operation_timeout(),
        }
    }

    /// Verify a login/password pair.
    ///
    /// An unknown login still pays for one Argon2 verification.
    pub async fn authenticate(&self, login: &str, password: &str) -> AppResult<Identity> {
        let login = normalize_login(login);
        let Some(identity) = self.find_optional(login).await? else {
            self.hasher.verify_decoy(password)?;
            info!(login = %login, "Rejected login for unknown identity");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify(password, &identity.password_hash)? {
            info!(login = %login, "Rejected login with wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        Ok(identity)
    }

    /// Register a new identity, enforcing the password policy.
    ///
    /// `requested_role` defaults to the configured default role.
    pub async fn register(
        &self,
        login: &str,
        password: &str,
        requested_role: Option<&str>,
    ) -> AppResult<Identity> {
        let login = normalize_login(login);
        if login.is_empty() {
            return Err(AppError::validation("Login must not be empty"));
        }
        self.validator.validate(login, password)?;

        let data = NewIdentity {
            login: login.to_string(),
            password_hash: self.hasher.hash(password)?,
            role: requested_role
                .map(role::normalize)
                .unwrap_or_else(|| self.default_role.clone()),
        };

        let identity = with_deadline(self.op_timeout, "identity insert", self.identities.create(&data))
            .await?;
        info!(login = %identity.login, user_id = identity.id, role = %identity.role, "Identity registered");
        Ok(identity)
    }

    /// Change the role of an existing identity.
    pub async fn set_role(&self, login: &str, new_role: &str) -> AppResult<()> {
        let login = normalize_login(login);
        let new_role = role::normalize(new_role);
        if new_role.is_empty() {
            return Err(AppError::validation("Role must not be empty"));
        }

        let updated = with_deadline(
            self.op_timeout,
            "identity role update",
            self.identities.update_role(login, &new_role),
        )
        .await?;
        if !updated {
            return Err(AppError::not_found(format!("Identity '{login}' not found")));
        }

        info!(login = %login, role = %new_role, "Identity role changed");
        Ok(())
    }

    /// Look up an identity by login.
    pub async fn find(&self, login: &str) -> AppResult<Identity> {
        self.find_optional(login)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Identity '{login}' not found")))
    }

    async fn find_optional(&self, login: &str) -> AppResult<Option<Identity>> {
        with_deadline(
            self.op_timeout,
            "identity lookup",
            self.identities.find_by_login(normalize_login(login)),
        )
        .await
    }
}

/// Logins are stored and looked up without surrounding whitespace.
fn normalize_login(login: &str) -> &str {
    login.trim()
}
