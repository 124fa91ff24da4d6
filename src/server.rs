use std::net::SocketAddr;

use tokio::signal;
use tracing::{error, info};

use crate::analytics::CardioAnalytics;
use crate::api::{create_router, AppState};
use crate::config::AppConfig;
use crate::error::{HeartError, Result};
use crate::prediction::InferencePipeline;

/// Load everything the API needs. Either failure aborts startup.
pub fn build_state(config: &AppConfig) -> Result<AppState> {
    let pipeline = InferencePipeline::load(&config.artifacts)?;
    let analytics = CardioAnalytics::load(&config.dataset)?;
    Ok(AppState::new(pipeline, analytics))
}

/// Serve until Ctrl+C / SIGTERM.
pub async fn serve(config: AppConfig) -> Result<()> {
    let state = build_state(&config)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| HeartError::InvalidConfig(format!("server address: {e}")))?;
    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HeartError::Internal(format!("API server error: {}", e)))?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
