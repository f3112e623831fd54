//! # User API Server
//!
//! Loads configuration, connects MySQL and Redis, wires the DI module and
//! serves the REST API until a shutdown signal arrives.

use tracing::{error, info};
use user_api_config::ConfigLoader;
use user_api_core::{UserApiError, UserApiResult};
use user_api_repository::{create_pool, DatabasePoolInterface};
use user_api_rest::create_router;
use user_api_server::{di::build_app_module, logging::init_logging, startup};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> UserApiResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_logging(&config.observability);

    info!("Starting {} v{}", config.app.name, env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let db_pool = create_pool(&config.database).await?;

    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let module = build_app_module(&db_pool, &config)?;
    let router = create_router(&*module, &config.server);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| UserApiError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    startup::print_startup_info(&config);

    axum::serve(listener, router)
        .with_graceful_shutdown(startup::shutdown_signal())
        .await
        .map_err(|e| UserApiError::Internal(format!("REST server error: {}", e)))?;

    db_pool.close().await;

    info!("Server shutdown complete");
    Ok(())
}
