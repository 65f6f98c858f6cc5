// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use project_hub::api::http_router;
use project_hub::config::CONFIG;
use project_hub::db;
use project_hub::state::AppState;

/// Graceful shutdown signal handler for SIGTERM and Ctrl+C
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(CONFIG.logging.tracing_level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting project-hub {}", env!("CARGO_PKG_VERSION"));

    let pool = db::connect(&CONFIG.database.url, CONFIG.database.max_connections).await?;
    let app_state = Arc::new(AppState::new(pool));
    let app = http_router(app_state);

    let bind_address = CONFIG.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Shutdown complete");
    Ok(())
}
