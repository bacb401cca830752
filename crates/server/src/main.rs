//! cuadro-server
//!
//! HTTP front end for the table extraction engine: multipart PDF
//! upload, content-addressed cached extraction, and retrieval of
//! stored results.

use std::net::SocketAddr;

use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cuadro_server::config::Config;
use cuadro_server::routes;
use cuadro_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cuadro_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Starting cuadro-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Scratch dir: {}", config.scratch_dir.display());

    let addr = SocketAddr::new(config.host.parse()?, config.port);
    let max_upload_bytes = config.max_upload_bytes;
    let app_state = AppState::new(config);

    let app = routes::router(max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    tracing::info!("cuadro-server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
