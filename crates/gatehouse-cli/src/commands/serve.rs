//! Start the Gatehouse server.

use clap::Args;

use gatehouse_core::config::AppConfig;
use gatehouse_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the public HTTP port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the identity RPC port
    #[arg(long)]
    pub rpc_port: Option<u16>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(port) = args.rpc_port {
        config.rpc.port = port;
    }

    println!("Starting Gatehouse...");
    println!("  HTTP: {}", config.server.bind_address());
    println!("  RPC:  {}", config.rpc.bind_address());

    gatehouse_api::run_server(config).await
}
