//! Database migration command.

use gatehouse_core::config::AppConfig;
use gatehouse_core::error::AppError;
use gatehouse_database::migration::run_migrations;

use crate::output;

/// Apply all pending migrations
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let db = super::connect_database(config).await?;

    println!("Running database migrations...");
    run_migrations(db.pool()).await?;
    db.close().await;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
