use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use video_compressor::app;
use video_compressor::config::settings::AppConfig;
use video_compressor::infrastructure::storage::StorageService;
use video_compressor::state::AppState;
use video_compressor::workers::transcoder::FfmpegTranscoder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = AppConfig::new().inspect_err(|e| error!("❌ {}", e))?;
    let endpoint = config.minio_endpoint_url()?;

    let storage = StorageService::new(
        &endpoint,
        &config.minio_region,
        &config.minio_access_key,
        &config.minio_secret_key,
    );
    let transcoder = FfmpegTranscoder::new(config.ffmpeg_path.clone());

    let port = config.server_port;
    let state = AppState::new(config.clone(), Arc::new(storage), Arc::new(transcoder));
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("🚀 FFmpeg compression service started");
    info!("   - Listening on: {}", addr);
    info!("   - MinIO endpoint: {}", endpoint);
    info!("   - SSL: {}", if config.minio_use_ssl { "enabled" } else { "disabled" });
    info!(
        "   - Max concurrent jobs: {}",
        match config.max_concurrent_jobs {
            0 => "unbounded".to_string(),
            n => n.to_string(),
        }
    );
    info!("   - GET  /health   - health check");
    info!("   - POST /compress - compress a stored video");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received");
}
