use std::sync::Arc;

use movietrack::{
    AppState, build_router,
    config::StoreBackend,
    database, load_config,
    services::images::LocalImageStore,
    store::{MemoryStore, PgStore, SharedStore},
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movietrack=info,tower_http=info")),
        )
        .init();

    let config = load_config()?;
    tracing::info!("Loaded configuration:\n{}", config);

    let store: SharedStore = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = database::connect(&config.database).await?;
            database::migrate(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let images = LocalImageStore::from_config(&config.uploads);
    images.init().await?;

    let address = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(store, Arc::new(images), config);
    let app = build_router(state);

    let listener = TcpListener::bind(&address).await?;
    tracing::info!(%address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
