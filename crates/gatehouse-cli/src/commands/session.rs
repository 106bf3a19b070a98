//! Session maintenance CLI commands.

use chrono::Utc;
use clap::{Args, Subcommand};

use gatehouse_core::config::AppConfig;
use gatehouse_core::error::AppError;
use gatehouse_database::SessionRepository;

use crate::output;

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Delete expired session rows from the relational store
    Purge,
}

/// Execute session commands
pub async fn execute(args: &SessionArgs, config: &AppConfig) -> Result<(), AppError> {
    let db = super::connect_database(config).await?;
    let sessions = SessionRepository::new(db.pool().clone());

    match &args.command {
        SessionCommand::Purge => {
            let removed = sessions.delete_expired(Utc::now()).await?;
            output::print_success(&format!("Removed {removed} expired session(s)"));
        }
    }

    db.close().await;
    Ok(())
}
