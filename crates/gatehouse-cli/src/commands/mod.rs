//! CLI command definitions and dispatch.

pub mod identity;
pub mod migrate;
pub mod serve;
pub mod session;

use clap::{Parser, Subcommand};

use gatehouse_core::config::AppConfig;
use gatehouse_core::error::AppError;
use gatehouse_database::DatabasePool;

use crate::output::OutputFormat;

/// Gatehouse: session and identity service
#[derive(Debug, Parser)]
#[command(name = "gatehouse", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (selects `config/{env}.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP and identity RPC listeners
    Serve(serve::ServeArgs),
    /// Apply pending database migrations
    Migrate,
    /// Identity management
    Identity(identity::IdentityArgs),
    /// Session maintenance
    Session(session::SessionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.env)?;

        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Identity(args) => identity::execute(args, &config, self.format).await,
            Commands::Session(args) => session::execute(args, &config).await,
        }
    }
}

/// Connect to PostgreSQL through the connectivity supervisor.
pub async fn connect_database(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}
