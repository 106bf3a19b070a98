//! Process wiring: supervise the stores, assemble the services, run the
//! public and internal listeners until one fails or a shutdown signal arrives.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use gatehouse_auth::{
    AccountService, IdentityService, IdentityStore, SessionManager, SessionStore,
};
use gatehouse_cache::CacheManager;
use gatehouse_core::config::AppConfig;
use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::CacheProvider;
use gatehouse_database::migration::run_migrations;
use gatehouse_database::{DatabasePool, IdentityRepository, SessionRepository};
use gatehouse_rpc::RpcState;

use crate::router::{build_internal_router, build_router};
use crate::state::AppState;

/// Everything the two listeners share.
#[derive(Debug, Clone)]
pub struct Services {
    /// State for the public router.
    pub app: AppState,
    /// State for the identity RPC router.
    pub rpc: RpcState,
}

impl Services {
    /// Assemble the session core over already-verified stores.
    pub fn assemble(
        config: AppConfig,
        database: Option<DatabasePool>,
        cache: Arc<dyn CacheProvider>,
        sessions: Arc<dyn SessionStore>,
        identities: Arc<dyn IdentityStore>,
    ) -> Self {
        let session_manager = Arc::new(SessionManager::new(
            sessions,
            Arc::clone(&cache),
            &config.session,
        ));
        let accounts = Arc::new(AccountService::new(
            Arc::clone(&identities),
            &config.session,
        ));
        let identity = Arc::new(IdentityService::new(
            Arc::clone(&session_manager),
            identities,
            config.session.operation_timeout(),
        ));

        let rpc = RpcState::new(identity, &config.rpc);
        let app = AppState {
            config: Arc::new(config),
            sessions: session_manager,
            accounts,
            database,
            cache,
        };

        Self { app, rpc }
    }
}

/// Connect both stores through the connectivity supervisor and migrate.
///
/// Either store exhausting its retry budget is fatal.
pub async fn connect_stores(config: &AppConfig) -> AppResult<(DatabasePool, CacheManager)> {
    let database = DatabasePool::connect(&config.database).await?;
    run_migrations(database.pool()).await?;

    info!(provider = %config.cache.provider, "Initializing cache");
    let cache = CacheManager::new(&config.cache).await?;

    Ok((database, cache))
}

/// Runs Gatehouse with the given configuration.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting Gatehouse...");

    let (database, cache) = connect_stores(&config).await?;
    let sessions = Arc::new(SessionRepository::new(database.pool().clone()));
    let identities = Arc::new(IdentityRepository::new(database.pool().clone()));

    let http_addr = config.server.bind_address();
    let rpc_addr = config.rpc.bind_address();

    let services = Services::assemble(
        config,
        Some(database.clone()),
        cache.provider(),
        sessions,
        identities,
    );

    let http = bind(&http_addr).await?;
    let rpc = bind(&rpc_addr).await?;
    info!(http = %http_addr, rpc = %rpc_addr, "Gatehouse listening");

    let result = serve(http, rpc, services).await;
    database.close().await;
    result
}

/// Serve both listeners until either fails or a shutdown signal arrives.
pub async fn serve(http: TcpListener, rpc: TcpListener, services: Services) -> AppResult<()> {
    let public = build_router(services.app);
    let internal = build_internal_router(services.rpc);

    tokio::select! {
        result = run_listener("http", http, public) => result,
        result = run_listener("rpc", rpc, internal) => result,
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            Ok(())
        }
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn run_listener(name: &'static str, listener: TcpListener, router: Router) -> AppResult<()> {
    match axum::serve(listener, router).await {
        Ok(()) => Err(AppError::internal(format!("{name} listener stopped unexpectedly"))),
        Err(e) => {
            error!(listener = name, error = %e, "Listener failed");
            Err(AppError::with_source(
                ErrorKind::Internal,
                format!("{name} listener failed"),
                e,
            ))
        }
    }
}

async fn bind(addr: &str) -> AppResult<TcpListener> {
    TcpListener::bind(addr).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Internal,
            format!("Failed to bind {addr}"),
            e,
        )
    })
}
