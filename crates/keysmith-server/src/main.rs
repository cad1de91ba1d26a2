use clap::Parser;
use keysmith_core::keygen::MockKeyGenerator;
use keysmith_server::server::config::{CliArgs, ServerConfig};
use keysmith_server::server::http::{self, AppState};
use keysmith_server::server::jobs::JobSupervisor;
use keysmith_server::server::store::SqliteStore;
use keysmith_server::server::telemetry::init_tracing;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

// Using mimalloc for better performance under contention, especially in
// musl environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    init_tracing();

    let store = Arc::new(SqliteStore::connect(&config.database_url).await?);
    let keygen = Arc::new(MockKeyGenerator::new(config.keygen_latency));
    let supervisor = Arc::new(JobSupervisor::new(store.clone(), keygen));

    let app = http::router(AppState {
        supervisor: Arc::clone(&supervisor),
        store,
        max_keys_per_request: config.max_keys_per_request,
    });

    let listener = TcpListener::bind(&config.server_addr).await?;
    tracing::info!(
        "Starting keysmith server on {} (max {} keys per request)",
        config.server_addr,
        config.max_keys_per_request
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The listener is closed; drain in-flight provisioning jobs before
    // exiting.
    supervisor.shutdown(config.shutdown_timeout).await;

    tracing::info!("Service shut down successfully");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Shutdown signal received, terminating gracefully...");
}
