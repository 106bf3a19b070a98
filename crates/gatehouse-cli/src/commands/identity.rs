//! Identity management CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use gatehouse_auth::AccountService;
use gatehouse_core::config::AppConfig;
use gatehouse_core::error::AppError;
use gatehouse_database::IdentityRepository;
use gatehouse_entity::Identity;

use crate::output::{self, OutputFormat};

/// Arguments for identity commands
#[derive(Debug, Args)]
pub struct IdentityArgs {
    /// Identity subcommand
    #[command(subcommand)]
    pub command: IdentityCommand,
}

/// Identity subcommands
#[derive(Debug, Subcommand)]
pub enum IdentityCommand {
    /// Register an identity
    Create {
        /// Login name
        #[arg(long)]
        login: String,
        /// Password (subject to the password policy)
        #[arg(long)]
        password: String,
        /// Role, defaults to the configured default role
        #[arg(long)]
        role: Option<String>,
    },
    /// Change the role of an identity
    SetRole {
        /// Login name
        #[arg(long)]
        login: String,
        /// New role
        #[arg(long)]
        role: String,
    },
    /// Show an identity
    Show {
        /// Login name
        #[arg(long)]
        login: String,
    },
}

/// Identity display row for table output
#[derive(Debug, Serialize, Tabled)]
struct IdentityRow {
    /// Numeric id
    id: i64,
    /// Login
    login: String,
    /// Role
    role: String,
    /// Created at
    created_at: String,
}

impl From<&Identity> for IdentityRow {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            login: identity.login.clone(),
            role: identity.role.clone(),
            created_at: identity.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute identity commands
pub async fn execute(
    args: &IdentityArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = super::connect_database(config).await?;
    let accounts = AccountService::new(
        Arc::new(IdentityRepository::new(db.pool().clone())),
        &config.session,
    );

    match &args.command {
        IdentityCommand::Create {
            login,
            password,
            role,
        } => {
            let identity = accounts.register(login, password, role.as_deref()).await?;
            output::print_rows(&[IdentityRow::from(&identity)], format);
            output::print_success(&format!("Identity '{}' created", identity.login));
        }
        IdentityCommand::SetRole { login, role } => {
            accounts.set_role(login, role).await?;
            output::print_success(&format!("Role of '{login}' set to '{role}'"));
        }
        IdentityCommand::Show { login } => {
            let identity = accounts.find(login).await?;
            output::print_rows(&[IdentityRow::from(&identity)], format);
        }
    }

    db.close().await;
    Ok(())
}
