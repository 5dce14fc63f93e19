// API Server Binary Entry Point
//
// Usage: cargo run --features api --bin api_server

use farm_advisor::{create_router, AdvisorConfig, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Default log level: info for our crate, warn for others
                "farm_advisor=info,tower_http=debug,axum=debug,warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from environment variables
    let config = AdvisorConfig::from_env();
    let port = config.port;

    tracing::info!("Configuration:");
    tracing::info!("  DATA_DIR: {}", config.data_dir.display());
    tracing::info!("  PORT: {}", port);
    tracing::info!(
        "  CACHE: {} entries, {}s TTL",
        config.cache_capacity,
        config.cache_ttl_secs
    );

    // Load datasets and build shared state
    tracing::info!("Initializing application state...");
    let state = AppState::new(config).await?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
